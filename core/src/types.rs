#![deny(missing_docs)]

//! # Type Catalog
//!
//! The seven JSON-Schema primitive kinds, their canonical order, and the
//! typed values produced by coercion.

use crate::error::{QueryError, QueryResult};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A primitive type tag.
///
/// The declaration order is the canonical order: `null < boolean < integer <
/// number < string < array < object`. It doubles as the coercion preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// `null`
    Null,
    /// `boolean`
    Boolean,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `string`
    String,
    /// `array`
    Array,
    /// `object`
    Object,
}

impl TypeTag {
    /// All tags in canonical order.
    pub const ALL: [TypeTag; 7] = [
        TypeTag::Null,
        TypeTag::Boolean,
        TypeTag::Integer,
        TypeTag::Number,
        TypeTag::String,
        TypeTag::Array,
        TypeTag::Object,
    ];

    /// The schema token for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
        }
    }

    /// Whether the tag describes a compound (array or object) value.
    pub fn is_compound(&self) -> bool {
        matches!(self, TypeTag::Array | TypeTag::Object)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| QueryError::Configuration(format!("Unknown schema type '{}'", s)))
    }
}

/// A de-duplicated list of type tags, sorted in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeList(Vec<TypeTag>);

impl TypeList {
    /// Normalizes raw schema tokens into a canonical list.
    ///
    /// Fails on the first token that is not one of the seven known tags.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> QueryResult<Self> {
        let set = tokens
            .iter()
            .map(|t| t.as_ref().parse::<TypeTag>())
            .collect::<QueryResult<BTreeSet<TypeTag>>>()?;
        Ok(Self(set.into_iter().collect()))
    }

    /// Builds a canonical list from tags in any order.
    pub fn from_tags(tags: impl IntoIterator<Item = TypeTag>) -> Self {
        let set: BTreeSet<TypeTag> = tags.into_iter().collect();
        Self(set.into_iter().collect())
    }

    /// The `[string]` list used wherever a schema leaves a type out.
    pub fn string() -> Self {
        Self(vec![TypeTag::String])
    }

    /// Whether `tag` is a candidate.
    pub fn contains(&self, tag: TypeTag) -> bool {
        self.0.binary_search(&tag).is_ok()
    }

    /// Whether the list has no candidates.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Candidates in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = TypeTag> + '_ {
        self.0.iter().copied()
    }

    /// Candidates as a slice.
    pub fn as_slice(&self) -> &[TypeTag] {
        &self.0
    }
}

impl fmt::Display for TypeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(TypeTag::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// A decoded, typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    /// JSON `null`.
    Null,
    /// `true` / `false`.
    Boolean(bool),
    /// A signed 64-bit integer.
    Integer(i64),
    /// A finite floating point number.
    Number(f64),
    /// Any string.
    String(String),
    /// An ordered sequence.
    Array(Vec<TypedValue>),
    /// String keys in insertion order.
    Object(IndexMap<String, TypedValue>),
}

impl TypedValue {
    /// The tag of this value.
    pub fn tag(&self) -> TypeTag {
        match self {
            TypedValue::Null => TypeTag::Null,
            TypedValue::Boolean(_) => TypeTag::Boolean,
            TypedValue::Integer(_) => TypeTag::Integer,
            TypedValue::Number(_) => TypeTag::Number,
            TypedValue::String(_) => TypeTag::String,
            TypedValue::Array(_) => TypeTag::Array,
            TypedValue::Object(_) => TypeTag::Object,
        }
    }

    /// The string a query would carry for this value.
    ///
    /// Scalars render in the form their coercion accepts back; compounds
    /// fall back to JSON text (use `ParameterSpec::to_query_pairs` for styled output).
    pub fn canonical_form(&self) -> String {
        match self {
            TypedValue::Null => "null".to_string(),
            TypedValue::Boolean(b) => b.to_string(),
            TypedValue::Integer(i) => i.to_string(),
            // Whole numbers keep their fraction (`3.0`) and never read back as integers.
            TypedValue::Number(n) => format!("{:?}", n),
            TypedValue::String(s) => s.clone(),
            TypedValue::Array(_) | TypedValue::Object(_) => self.to_json().to_string(),
        }
    }

    /// Converts into a `serde_json::Value`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            TypedValue::Null => JsonValue::Null,
            TypedValue::Boolean(b) => JsonValue::Bool(*b),
            TypedValue::Integer(i) => JsonValue::from(*i),
            TypedValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            TypedValue::String(s) => JsonValue::String(s.clone()),
            TypedValue::Array(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            TypedValue::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_order_dedup() {
        let list =
            TypeList::from_tokens(&["object", "string", "null", "string", "integer"]).unwrap();
        assert_eq!(
            list.as_slice(),
            &[
                TypeTag::Null,
                TypeTag::Integer,
                TypeTag::String,
                TypeTag::Object
            ]
        );
        assert_eq!(list.to_string(), "[null, integer, string, object]");
    }

    #[test]
    fn test_every_permutation_sorts_identically() {
        let tokens = ["array", "boolean", "number"];
        let expected = TypeList::from_tokens(&tokens).unwrap();
        let rotations = [
            ["boolean", "number", "array"],
            ["number", "array", "boolean"],
            ["number", "boolean", "array"],
        ];
        for r in rotations {
            assert_eq!(TypeList::from_tokens(&r).unwrap(), expected);
        }
        assert_eq!(
            expected.as_slice(),
            &[TypeTag::Boolean, TypeTag::Number, TypeTag::Array]
        );
    }

    #[test]
    fn test_unknown_type_is_configuration_error() {
        let err = TypeList::from_tokens(&["string", "file"]).unwrap_err();
        assert!(matches!(err, QueryError::Configuration(msg) if msg.contains("file")));
    }

    #[test]
    fn test_typed_value_json() {
        let mut obj = IndexMap::new();
        obj.insert("a".to_string(), TypedValue::Integer(1));
        obj.insert("b".to_string(), TypedValue::Null);
        let value = TypedValue::Array(vec![
            TypedValue::Object(obj),
            TypedValue::Number(1.5),
            TypedValue::Boolean(true),
            "x".into(),
        ]);
        let expected = json!([{ "a": 1, "b": null }, 1.5, true, "x"]);
        assert_eq!(value.to_json(), expected);
        assert_eq!(serde_json::to_value(&value).unwrap(), expected);
    }

    #[test]
    fn test_canonical_form_scalars() {
        assert_eq!(TypedValue::Null.canonical_form(), "null");
        assert_eq!(TypedValue::Boolean(false).canonical_form(), "false");
        assert_eq!(TypedValue::Integer(-7).canonical_form(), "-7");
        assert_eq!(TypedValue::Number(2.5).canonical_form(), "2.5");
        assert_eq!(TypedValue::Number(3.0).canonical_form(), "3.0");
        assert_eq!(TypedValue::Number(-0.0).canonical_form(), "-0.0");
        assert_eq!(TypedValue::from("hi").canonical_form(), "hi");
    }
}
