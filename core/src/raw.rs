#![deny(missing_docs)]

//! # Raw Query
//!
//! An ordered multimap of percent-decoded query keys and values, as handed
//! over by the HTTP layer.

use crate::error::{QueryError, QueryResult};
use percent_encoding::percent_decode_str;

/// Percent-decoded query pairs, in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    entries: Vec<(String, String)>,
}

impl RawQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is skipped, `+` decodes to a space, and a segment
    /// without `=` maps to the empty string.
    pub fn parse(query: &str) -> QueryResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut raw = RawQuery::new();
        for segment in query.split('&').filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            raw.push(decode_component(key)?, decode_component(value)?);
        }
        Ok(raw)
    }

    /// Appends a pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// All values of `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The last value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `key` appears at least once.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Every pair, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawQuery {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn decode_component(component: &str) -> QueryResult<String> {
    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .map_err(|e| {
            QueryError::Format(format!(
                "Query component '{}' is not valid UTF-8 once decoded: {}",
                component, e
            ))
        })
}
