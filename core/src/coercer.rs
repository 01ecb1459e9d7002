#![deny(missing_docs)]

//! # Type Coercer
//!
//! Turns style-decoded strings into typed values. Candidates are tried in
//! canonical order and the first one that parses wins, so `"5"` against
//! `[integer, string]` is the integer `5`.

use crate::decoder::DecodedValue;
use crate::error::{QueryError, QueryResult};
use crate::spec::{ElementPlan, ParameterSpec, PropertyPlan};
use crate::types::{TypeList, TypeTag, TypedValue};
use indexmap::IndexMap;

/// Coerces one style-decoded value through its spec.
pub fn coerce(spec: &ParameterSpec, value: DecodedValue) -> QueryResult<TypedValue> {
    match value {
        DecodedValue::Scalar(raw) => coerce_scalar(&spec.name, &spec.types, &raw),
        DecodedValue::Sequence(tokens) => {
            if !spec.types.contains(TypeTag::Array) {
                return Err(shape_mismatch(spec, "a list of values"));
            }
            coerce_sequence(&spec.name, spec.elements(), tokens)
        }
        DecodedValue::Pairs(pairs) => {
            if !spec.types.contains(TypeTag::Object) {
                return Err(shape_mismatch(spec, "key/value pairs"));
            }
            coerce_pairs(&spec.name, spec.properties(), pairs)
        }
    }
}

/// Coerces a raw value that has no spec: scalars stay strings, pairs
/// become an object of strings, sequences an array of strings.
pub fn passthrough(value: DecodedValue) -> TypedValue {
    match value {
        DecodedValue::Scalar(raw) => TypedValue::String(raw),
        DecodedValue::Sequence(tokens) => {
            TypedValue::Array(tokens.into_iter().map(TypedValue::String).collect())
        }
        DecodedValue::Pairs(pairs) => TypedValue::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k, TypedValue::String(v)))
                .collect(),
        ),
    }
}

/// Tries each scalar candidate of `types` against `raw`.
///
/// `label` names the value in error messages (`tags[2]`, `color.R`, ...).
pub fn coerce_scalar(label: &str, types: &TypeList, raw: &str) -> QueryResult<TypedValue> {
    types
        .iter()
        .find_map(|tag| parse_as(tag, raw))
        .ok_or_else(|| {
            QueryError::Validation(format!(
                "Query parameter '{}' value '{}' does not match any of {}",
                label, raw, types
            ))
        })
}

/// Parses `raw` as a single tag. Compound tags never match a lone string.
fn parse_as(tag: TypeTag, raw: &str) -> Option<TypedValue> {
    match tag {
        TypeTag::Null => matches!(raw, "" | "null").then_some(TypedValue::Null),
        TypeTag::Boolean => match raw {
            "true" => Some(TypedValue::Boolean(true)),
            "false" => Some(TypedValue::Boolean(false)),
            _ => None,
        },
        TypeTag::Integer => raw.parse::<i64>().ok().map(TypedValue::Integer),
        TypeTag::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(TypedValue::Number),
        TypeTag::String => Some(TypedValue::String(raw.to_string())),
        TypeTag::Array | TypeTag::Object => None,
    }
}

fn coerce_sequence(
    name: &str,
    plan: Option<&ElementPlan>,
    tokens: Vec<String>,
) -> QueryResult<TypedValue> {
    let Some(plan) = plan else {
        return Ok(TypedValue::Array(
            tokens.into_iter().map(TypedValue::String).collect(),
        ));
    };

    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let label = format!("{}[{}]", name, index);
            let types = plan.types_at(index).ok_or_else(|| {
                QueryError::Validation(format!(
                    "Query parameter '{}' has no type for position {} ({} positional types, no additional items)",
                    name,
                    index,
                    plan.prefix.len()
                ))
            })?;
            coerce_scalar(&label, types, token)
        })
        .collect::<QueryResult<Vec<_>>>()
        .map(TypedValue::Array)
}

fn coerce_pairs(
    name: &str,
    plan: Option<&PropertyPlan>,
    pairs: Vec<(String, String)>,
) -> QueryResult<TypedValue> {
    let mut object = IndexMap::with_capacity(pairs.len());
    for (key, raw) in pairs {
        let value = match plan {
            Some(plan) => {
                let label = format!("{}.{}", name, key);
                coerce_scalar(&label, plan.types_for(&key), &raw)?
            }
            None => TypedValue::String(raw),
        };
        object.insert(key, value);
    }
    Ok(TypedValue::Object(object))
}

fn shape_mismatch(spec: &ParameterSpec, shape: &str) -> QueryError {
    QueryError::Validation(format!(
        "Query parameter '{}' was sent as {} but is typed {}",
        spec.name, shape, spec.types
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::ParameterDeclaration;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> ParameterSpec {
        let declaration: ParameterDeclaration = serde_json::from_value(value).unwrap();
        ParameterSpec::build(&declaration).unwrap().unwrap()
    }

    fn list(tokens: &[&str]) -> TypeList {
        TypeList::from_tokens(tokens).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_candidates_in_canonical_order() {
        let types = list(&["string", "number", "integer", "boolean", "null"]);
        assert_eq!(coerce_scalar("p", &types, "").unwrap(), TypedValue::Null);
        assert_eq!(coerce_scalar("p", &types, "null").unwrap(), TypedValue::Null);
        assert_eq!(
            coerce_scalar("p", &types, "true").unwrap(),
            TypedValue::Boolean(true)
        );
        assert_eq!(
            coerce_scalar("p", &types, "42").unwrap(),
            TypedValue::Integer(42)
        );
        assert_eq!(
            coerce_scalar("p", &types, "4.5").unwrap(),
            TypedValue::Number(4.5)
        );
        assert_eq!(
            coerce_scalar("p", &types, "abc").unwrap(),
            TypedValue::from("abc")
        );
    }

    #[test]
    fn test_number_accepts_integers_but_not_nan() {
        let types = list(&["number"]);
        assert_eq!(
            coerce_scalar("p", &types, "3").unwrap(),
            TypedValue::Number(3.0)
        );
        assert!(coerce_scalar("p", &types, "NaN").is_err());
        assert!(coerce_scalar("p", &types, "inf").is_err());
    }

    #[test]
    fn test_exhausted_candidates_fail() {
        let err = coerce_scalar("limit", &list(&["integer", "boolean"]), "ten").unwrap_err();
        match err {
            QueryError::Validation(msg) => {
                assert!(msg.contains("limit"));
                assert!(msg.contains("[boolean, integer]"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_compound_tags_never_match_scalars() {
        assert!(coerce_scalar("p", &list(&["array"]), "a").is_err());
        assert!(coerce_scalar("p", &list(&["object"]), "a").is_err());
    }

    #[test]
    fn test_array_prefix_then_items() {
        let spec = spec(json!({
            "name": "xs",
            "schema": {"type": "array", "prefixItems": [{"type": "integer"}], "items": {"type": "string"}}
        }));
        let out = coerce(&spec, DecodedValue::Sequence(strings(&["5", "x", "y"]))).unwrap();
        assert_eq!(
            out,
            TypedValue::Array(vec![TypedValue::Integer(5), "x".into(), "y".into()])
        );
    }

    #[test]
    fn test_array_prefix_element_failure() {
        let spec = spec(json!({
            "name": "xs",
            "schema": {"type": "array", "prefixItems": [{"type": "integer"}], "items": {}}
        }));
        let err = coerce(&spec, DecodedValue::Sequence(strings(&["x"]))).unwrap_err();
        assert!(matches!(err, QueryError::Validation(msg) if msg.contains("xs[0]")));
    }

    #[test]
    fn test_array_index_without_type_fails() {
        let spec = spec(json!({
            "name": "pair",
            "schema": {"type": "array", "prefixItems": [{"type": "integer"}, {"type": "integer"}]}
        }));
        assert!(coerce(&spec, DecodedValue::Sequence(strings(&["1", "2"]))).is_ok());
        let err = coerce(&spec, DecodedValue::Sequence(strings(&["1", "2", "3"]))).unwrap_err();
        assert!(matches!(err, QueryError::Validation(msg) if msg.contains("position 2")));
    }

    #[test]
    fn test_array_without_plan_keeps_strings() {
        let spec = spec(json!({"name": "tags", "schema": {"type": "array"}}));
        let out = coerce(&spec, DecodedValue::Sequence(strings(&["1", "true"]))).unwrap();
        assert_eq!(out, TypedValue::Array(vec!["1".into(), "true".into()]));
    }

    #[test]
    fn test_object_property_resolution() {
        let spec = spec(json!({
            "name": "color",
            "schema": {
                "type": "object",
                "properties": {"R": {"type": "integer"}},
                "patternProperties": {"^[GB]$": {"type": "number"}},
                "additionalProperties": {"type": "boolean"}
            }
        }));
        let pairs = vec![
            ("R".to_string(), "100".to_string()),
            ("G".to_string(), "200".to_string()),
            ("alpha".to_string(), "false".to_string()),
        ];
        let out = coerce(&spec, DecodedValue::Pairs(pairs)).unwrap();
        assert_eq!(
            out.to_json(),
            json!({"R": 100, "G": 200.0, "alpha": false})
        );
    }

    #[test]
    fn test_object_default_types_are_strings() {
        let spec = spec(json!({"name": "color", "schema": {"type": "object"}}));
        let pairs = vec![("R".to_string(), "100".to_string())];
        let out = coerce(&spec, DecodedValue::Pairs(pairs)).unwrap();
        assert_eq!(out.to_json(), json!({"R": "100"}));
    }

    #[test]
    fn test_shape_mismatch() {
        let spec = spec(json!({"name": "f", "style": "deepObject", "schema": {"type": "integer"}}));
        let err = coerce(&spec, DecodedValue::Pairs(vec![])).unwrap_err();
        assert!(matches!(err, QueryError::Validation(msg) if msg.contains("key/value")));
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(
            passthrough(DecodedValue::Scalar("1".into())),
            TypedValue::from("1")
        );
        assert_eq!(
            passthrough(DecodedValue::Pairs(vec![("a".into(), "b".into())])).to_json(),
            json!({"a": "b"})
        );
    }
}
