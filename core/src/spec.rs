#![deny(missing_docs)]

//! # Parameter Specs
//!
//! Turns one `ParameterDeclaration` into an immutable `ParameterSpec`: the
//! candidate types, the resolved style, and the element/property type plans
//! of compound values. Pattern properties are compiled here, once.

use crate::declaration::{ParameterDeclaration, SchemaDeclaration, SubSchema};
use crate::error::{QueryError, QueryResult};
use crate::types::{TypeList, TypeTag, TypedValue};
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;

/// How a compound value is flattened into the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Comma separated (`a,b,c`). The default for compound values.
    Form,
    /// Space separated (`a b c`).
    SpaceDelimited,
    /// Pipe separated (`a|b|c`).
    PipeDelimited,
    /// One query key per field (`name[field]=value`).
    DeepObject,
}

impl Style {
    /// Resolves the style token of a compound parameter.
    ///
    /// An absent token means `form`.
    pub fn from_token(token: Option<&str>) -> Option<Style> {
        match token {
            None | Some("form") => Some(Style::Form),
            Some("spaceDelimited") => Some(Style::SpaceDelimited),
            Some("pipeDelimited") => Some(Style::PipeDelimited),
            Some("deepObject") => Some(Style::DeepObject),
            Some(_) => None,
        }
    }

    /// The separator between tokens, if the style flattens into one value.
    pub fn delimiter(&self) -> Option<char> {
        match self {
            Style::Form => Some(','),
            Style::SpaceDelimited => Some(' '),
            Style::PipeDelimited => Some('|'),
            Style::DeepObject => None,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Style::Form => "form",
            Style::SpaceDelimited => "spaceDelimited",
            Style::PipeDelimited => "pipeDelimited",
            Style::DeepObject => "deepObject",
        };
        f.write_str(name)
    }
}

/// Per-position types of an array parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementPlan {
    /// Types of the leading positions (`prefixItems`).
    pub prefix: Vec<TypeList>,
    /// Types of every other position (`items` / `additionalItems`).
    /// `None` means positions past the prefix are not allowed.
    pub items: Option<TypeList>,
}

impl ElementPlan {
    /// The candidate types for position `index`.
    pub fn types_at(&self, index: usize) -> Option<&TypeList> {
        self.prefix.get(index).or(self.items.as_ref())
    }
}

/// Per-key types of an object parameter.
#[derive(Debug, Clone)]
pub struct PropertyPlan {
    /// Declared properties, matched exactly.
    pub properties: IndexMap<String, TypeList>,
    /// `patternProperties`, tried in declaration order.
    pub patterns: Vec<(Regex, TypeList)>,
    /// Types of keys matching neither.
    pub additional: TypeList,
}

impl PropertyPlan {
    /// The candidate types for `key`.
    pub fn types_for(&self, key: &str) -> &TypeList {
        if let Some(types) = self.properties.get(key) {
            return types;
        }
        self.patterns
            .iter()
            .find(|(re, _)| re.is_match(key))
            .map(|(_, types)| types)
            .unwrap_or(&self.additional)
    }
}

/// Inner typing of a compound parameter.
#[derive(Debug, Clone)]
pub enum InnerPlan {
    /// Array parameter.
    Elements(ElementPlan),
    /// Object parameter.
    Properties(PropertyPlan),
}

/// The precomputed decoding plan of one query parameter.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Declared name.
    pub name: String,
    /// Candidate types, canonical order, never empty.
    pub types: TypeList,
    /// Set for compound parameters and for every `deepObject` parameter.
    pub style: Option<Style>,
    /// Element or property typing.
    pub inner: Option<InnerPlan>,
}

impl ParameterSpec {
    /// Builds the spec of a declaration.
    ///
    /// Returns `Ok(None)` when the declaration has no `schema.type`: such a
    /// parameter is only tracked for required/deprecated purposes.
    pub fn build(declaration: &ParameterDeclaration) -> QueryResult<Option<ParameterSpec>> {
        let name = declaration.name.clone();
        if name.is_empty() {
            return Err(QueryError::Configuration(
                "Parameter declarations must have a non-empty name".to_string(),
            ));
        }

        let Some(schema) = declaration.schema.as_ref() else {
            return Ok(None);
        };
        let Some(types) = schema_types(schema)? else {
            return Ok(None);
        };

        let has_array = types.contains(TypeTag::Array);
        let has_object = types.contains(TypeTag::Object);
        if has_array && has_object {
            return Err(QueryError::Configuration(format!(
                "Parameter '{}' declares both 'array' and 'object'; pick one",
                name
            )));
        }

        let style = resolve_style(&name, declaration.style.as_deref(), has_array || has_object)?;

        let inner = if has_array {
            element_plan(schema)?.map(InnerPlan::Elements)
        } else if has_object {
            Some(InnerPlan::Properties(property_plan(&name, schema)?))
        } else {
            None
        };

        tracing::debug!(
            parameter = %name,
            types = %types,
            style = ?style,
            "built query parameter spec"
        );

        Ok(Some(ParameterSpec {
            name,
            types,
            style,
            inner,
        }))
    }

    /// The array element plan, if any.
    pub fn elements(&self) -> Option<&ElementPlan> {
        match &self.inner {
            Some(InnerPlan::Elements(plan)) => Some(plan),
            _ => None,
        }
    }

    /// The object property plan, if any.
    pub fn properties(&self) -> Option<&PropertyPlan> {
        match &self.inner {
            Some(InnerPlan::Properties(plan)) => Some(plan),
            _ => None,
        }
    }

    /// Renders a value back into the query pairs this spec decodes.
    ///
    /// Delimited styles produce a single `name=value` pair; `deepObject`
    /// produces one `name[key]=value` pair per field.
    pub fn to_query_pairs(&self, value: &TypedValue) -> Vec<(String, String)> {
        match (self.style, value) {
            (Some(Style::DeepObject), TypedValue::Object(map)) => map
                .iter()
                .map(|(k, v)| (format!("{}[{}]", self.name, k), v.canonical_form()))
                .collect(),
            (Some(style), TypedValue::Array(items)) => {
                let tokens: Vec<String> = items.iter().map(TypedValue::canonical_form).collect();
                vec![(self.name.clone(), join_tokens(style, &tokens))]
            }
            (Some(style), TypedValue::Object(map)) => {
                let tokens: Vec<String> = map
                    .iter()
                    .flat_map(|(k, v)| [k.clone(), v.canonical_form()])
                    .collect();
                vec![(self.name.clone(), join_tokens(style, &tokens))]
            }
            _ => vec![(self.name.clone(), value.canonical_form())],
        }
    }
}

fn join_tokens(style: Style, tokens: &[String]) -> String {
    match style.delimiter() {
        Some(d) => tokens.join(&d.to_string()),
        None => tokens.join(","),
    }
}

/// Normalizes `schema.type`. `None` when the schema declares no type.
fn schema_types(schema: &SchemaDeclaration) -> QueryResult<Option<TypeList>> {
    let Some(declared) = schema.schema_type.as_ref() else {
        return Ok(None);
    };
    let types = TypeList::from_tokens(declared.tokens().as_slice())?;
    Ok((!types.is_empty()).then_some(types))
}

/// Like `schema_types`, defaulting to `[string]`.
fn schema_types_or_string(schema: &SchemaDeclaration) -> QueryResult<TypeList> {
    Ok(schema_types(schema)?.unwrap_or_else(TypeList::string))
}

fn sub_schema_types(sub: &SubSchema) -> QueryResult<Option<TypeList>> {
    match sub {
        SubSchema::Bool(false) => Ok(None),
        SubSchema::Bool(true) | SubSchema::Tuple(_) => Ok(Some(TypeList::string())),
        SubSchema::Schema(schema) => schema_types_or_string(schema).map(Some),
    }
}

/// Resolves the style.
///
/// `deepObject` always applies. Any other style only matters for compound
/// types, where unknown tokens are rejected; scalars never carry a style.
fn resolve_style(name: &str, token: Option<&str>, compound: bool) -> QueryResult<Option<Style>> {
    if token == Some("deepObject") {
        return Ok(Some(Style::DeepObject));
    }
    if !compound {
        return Ok(None);
    }
    match Style::from_token(token) {
        Some(style) => Ok(Some(style)),
        None => Err(QueryError::Configuration(format!(
            "Parameter '{}' uses style '{}' which is not supported for array/object query parameters. Allowed styles: form, spaceDelimited, pipeDelimited, deepObject",
            name,
            token.unwrap_or_default()
        ))),
    }
}

/// Builds the element plan. `None` when the schema says nothing about its
/// elements, in which case elements stay strings.
fn element_plan(schema: &SchemaDeclaration) -> QueryResult<Option<ElementPlan>> {
    let tuple = match &schema.items {
        Some(SubSchema::Tuple(tuple)) if schema.prefix_items.is_none() => Some(tuple),
        _ => None,
    };
    let prefix_schemas = schema.prefix_items.as_ref().or(tuple);
    let rest = match (&schema.items, &schema.additional_items) {
        (Some(SubSchema::Tuple(_)), additional) => additional.as_ref(),
        (Some(items), _) => Some(items),
        (None, additional) => additional.as_ref(),
    };

    if prefix_schemas.is_none() && schema.items.is_none() && schema.additional_items.is_none() {
        return Ok(None);
    }

    let prefix = prefix_schemas
        .map(|list| {
            list.iter()
                .map(schema_types_or_string)
                .collect::<QueryResult<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();

    let items = match rest {
        Some(sub) => sub_schema_types(sub)?,
        None => None,
    };

    Ok(Some(ElementPlan { prefix, items }))
}

fn property_plan(name: &str, schema: &SchemaDeclaration) -> QueryResult<PropertyPlan> {
    let mut properties = IndexMap::new();
    for (key, prop) in schema.properties.iter().flatten() {
        properties.insert(key.clone(), schema_types_or_string(prop)?);
    }

    let mut patterns = Vec::new();
    for (pattern, prop) in schema.pattern_properties.iter().flatten() {
        let re = Regex::new(pattern).map_err(|e| {
            QueryError::Configuration(format!(
                "Parameter '{}' has invalid patternProperties key '{}': {}",
                name, pattern, e
            ))
        })?;
        patterns.push((re, schema_types_or_string(prop)?));
    }

    let additional = match &schema.additional_properties {
        Some(SubSchema::Schema(prop)) => schema_types_or_string(prop)?,
        _ => TypeList::string(),
    };

    Ok(PropertyPlan {
        properties,
        patterns,
        additional,
    })
}
