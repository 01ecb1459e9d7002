#![deny(missing_docs)]

//! # Parameter Declarations
//!
//! Serde shims for the subset of an OpenAPI parameter object the engine reads.
//! Unknown fields (`description`, `example`, ...) are accepted and ignored.

use crate::error::QueryResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One entry of an OpenAPI `parameters` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    /// Name of the parameter.
    pub name: String,
    /// Location of the parameter (`query`, `path`, ...). Absent means query.
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Whether the parameter must be present.
    #[serde(default)]
    pub required: bool,
    /// Whether the parameter is deprecated.
    #[serde(default)]
    pub deprecated: bool,
    /// Serialization style (`form`, `spaceDelimited`, `pipeDelimited`, `deepObject`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Schema of the parameter value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDeclaration>,
}

impl ParameterDeclaration {
    /// Creates an optional query parameter without a schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Marks the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the parameter as deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Sets the serialization style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Sets the schema.
    pub fn with_schema(mut self, schema: SchemaDeclaration) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Whether the parameter lives in the query string.
    pub fn is_query(&self) -> bool {
        self.location
            .as_deref()
            .map_or(true, |l| l.eq_ignore_ascii_case("query"))
    }
}

/// `schema.type`: either a single token or a list of tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDeclaration {
    /// `type: string`
    Single(String),
    /// `type: [string, "null"]`
    Multiple(Vec<String>),
}

impl TypeDeclaration {
    /// The declared tokens.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            TypeDeclaration::Single(t) => vec![t.as_str()],
            TypeDeclaration::Multiple(ts) => ts.iter().map(String::as_str).collect(),
        }
    }
}

/// A schema slot that JSON Schema allows to be a boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubSchema {
    /// `true` / `false`.
    Bool(bool),
    /// Draft-4 tuple form of `items`.
    Tuple(Vec<SchemaDeclaration>),
    /// A nested schema object.
    Schema(Box<SchemaDeclaration>),
}

/// The schema keywords used to plan decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDeclaration {
    /// `type`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeDeclaration>,
    /// `prefixItems`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_items: Option<Vec<SchemaDeclaration>>,
    /// `items`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<SubSchema>,
    /// `additionalItems`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<SubSchema>,
    /// `properties`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaDeclaration>>,
    /// `patternProperties`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_properties: Option<IndexMap<String, SchemaDeclaration>>,
    /// `additionalProperties`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<SubSchema>,
}

impl SchemaDeclaration {
    /// A schema with only `type` set.
    pub fn typed(tokens: &[&str]) -> Self {
        let schema_type = match tokens {
            [single] => TypeDeclaration::Single(single.to_string()),
            many => TypeDeclaration::Multiple(many.iter().map(|t| t.to_string()).collect()),
        };
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParameterDocument {
    List(Vec<ParameterDeclaration>),
    Operation { parameters: Vec<ParameterDeclaration> },
}

/// Parses a parameter list from JSON or YAML.
///
/// Accepts either a bare array of parameters or an operation object
/// carrying a `parameters` key.
pub fn parse_parameter_list(document: &str) -> QueryResult<Vec<ParameterDeclaration>> {
    let parsed: ParameterDocument = serde_yaml::from_str(document)?;
    Ok(match parsed {
        ParameterDocument::List(list) => list,
        ParameterDocument::Operation { parameters } => parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    #[test]
    fn test_parse_yaml_list() {
        let yaml = r#"
- name: tags
  in: query
  description: filter tags
  schema:
    type: array
    items:
      type: integer
- name: old
  deprecated: true
  schema:
    type: [string, "null"]
"#;
        let params = parse_parameter_list(yaml).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "tags");
        let schema = params[0].schema.as_ref().unwrap();
        assert_eq!(
            schema.schema_type,
            Some(TypeDeclaration::Single("array".into()))
        );
        match &schema.items {
            Some(SubSchema::Schema(inner)) => {
                assert_eq!(
                    inner.schema_type.as_ref().unwrap().tokens(),
                    vec!["integer"]
                )
            }
            other => panic!("unexpected items: {:?}", other),
        }
        assert!(params[1].deprecated);
        assert_eq!(
            params[1]
                .schema
                .as_ref()
                .and_then(|s| s.schema_type.as_ref())
                .unwrap()
                .tokens(),
            vec!["string", "null"]
        );
    }

    #[test]
    fn test_parse_json_operation() {
        let json = r#"{
            "operationId": "listPets",
            "parameters": [
                {"name": "filter", "in": "query", "style": "deepObject",
                 "schema": {"type": "object", "additionalProperties": false}}
            ]
        }"#;
        let params = parse_parameter_list(json).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].style.as_deref(), Some("deepObject"));
        assert_eq!(
            params[0].schema.as_ref().unwrap().additional_properties,
            Some(SubSchema::Bool(false))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_parameter_list("just a string").unwrap_err();
        assert!(matches!(err, QueryError::Parse(_)));
    }

    #[test]
    fn test_is_query() {
        assert!(ParameterDeclaration::new("a").is_query());
        let mut header = ParameterDeclaration::new("b");
        header.location = Some("header".into());
        assert!(!header.is_query());
        header.location = Some("Query".into());
        assert!(header.is_query());
    }
}
