#![deny(missing_docs)]

//! # Style Decoder
//!
//! Splits raw query values according to each parameter's style, before any
//! type coercion happens.
//!
//! - scalars pass through unchanged;
//! - `form`, `spaceDelimited` and `pipeDelimited` split on `,`, ` ` and `|`;
//! - object values are then paired two tokens at a time;
//! - `deepObject` collects `name[key]=value` entries.

use crate::context::QueryContext;
use crate::error::{QueryError, QueryResult};
use crate::raw::RawQuery;
use crate::spec::Style;
use crate::types::TypeTag;
use indexmap::IndexMap;

/// A style-decoded, still untyped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    /// A single raw string.
    Scalar(String),
    /// Ordered tokens of an array.
    Sequence(Vec<String>),
    /// Ordered key/value pairs of an object.
    Pairs(Vec<(String, String)>),
}

/// Style-decodes every declared parameter present in `raw`.
///
/// Undeclared keys are dropped. Absent parameters are absent from the result.
pub fn decode(ctx: &QueryContext, raw: &RawQuery) -> QueryResult<IndexMap<String, DecodedValue>> {
    let mut deep: IndexMap<&str, Vec<(String, String)>> = IndexMap::new();
    for (key, value) in raw.iter() {
        if ctx.declared.contains(key) {
            continue;
        }
        match split_deep_key(key) {
            Some((name, field)) if ctx.is_deep_object(name) => deep
                .entry(name)
                .or_default()
                .push((field.to_string(), value.to_string())),
            _ => tracing::trace!(key, "ignoring undeclared query key"),
        }
    }

    let mut decoded = IndexMap::new();
    for name in &ctx.declared {
        if ctx.is_deep_object(name) {
            if let Some(pairs) = deep.shift_remove(name.as_str()) {
                decoded.insert(name.clone(), DecodedValue::Pairs(pairs));
            }
            continue;
        }

        let values: Vec<&str> = raw.get_all(name).collect();
        let Some(last) = values.last() else {
            continue;
        };

        let style = ctx.spec(name).and_then(|spec| spec.style.map(|s| (spec, s)));
        let value = match style {
            None => DecodedValue::Scalar(last.to_string()),
            Some((spec, style)) => {
                let tokens: Vec<String> = values
                    .iter()
                    .flat_map(|v| split_tokens(style, v))
                    .collect();
                if spec.types.contains(TypeTag::Array) {
                    DecodedValue::Sequence(tokens)
                } else {
                    DecodedValue::Pairs(pair_tokens(name, style, tokens)?)
                }
            }
        };
        decoded.insert(name.clone(), value);
    }
    Ok(decoded)
}

/// Splits `name[field]` into `(name, field)`. Nested brackets are rejected.
fn split_deep_key(key: &str) -> Option<(&str, &str)> {
    let (name, field) = key.strip_suffix(']')?.split_once('[')?;
    if name.is_empty() || field.contains(['[', ']']) {
        return None;
    }
    Some((name, field))
}

/// Splits one raw value by the style delimiter. The empty string has no tokens.
fn split_tokens(style: Style, raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    match style.delimiter() {
        Some(delimiter) => raw.split(delimiter).map(str::to_string).collect(),
        None => vec![raw.to_string()],
    }
}

fn pair_tokens(name: &str, style: Style, tokens: Vec<String>) -> QueryResult<Vec<(String, String)>> {
    if tokens.len() % 2 != 0 {
        return Err(QueryError::Format(format!(
            "Query parameter '{}' ({} style) has a key without a value: {} tokens",
            name,
            style,
            tokens.len()
        )));
    }
    let mut pairs = Vec::with_capacity(tokens.len() / 2);
    let mut iter = tokens.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        pairs.push((key, value));
    }
    Ok(pairs)
}
