#![deny(missing_docs)]

//! # Post-decoding Checks
//!
//! Required-parameter enforcement and deprecation warnings, run over the
//! final decoded mapping.

use crate::context::QueryContext;
use crate::error::{MissingRequired, QueryError, QueryResult};
use indexmap::IndexMap;
use std::fmt;

/// Header that carries deprecation warnings.
pub const WARNING_HEADER: &str = "warning";

/// An advisory notice that a deprecated parameter was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationWarning {
    /// The deprecated parameter.
    pub name: String,
}

impl DeprecationWarning {
    /// The value of the `warning` response header.
    pub fn header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DeprecationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "299 - the query parameter `{}` is deprecated.", self.name)
    }
}

/// Fails with `MissingRequired` unless every required name was decoded.
pub fn check_required<V>(ctx: &QueryContext, decoded: &IndexMap<String, V>) -> QueryResult<()> {
    let names: Vec<String> = ctx
        .required
        .iter()
        .filter(|name| !decoded.contains_key(name.as_str()))
        .cloned()
        .collect();
    if names.is_empty() {
        Ok(())
    } else {
        Err(QueryError::MissingRequired(MissingRequired { names }))
    }
}

/// One warning per deprecated parameter present in `decoded`.
pub fn annotate_deprecated<V>(
    ctx: &QueryContext,
    decoded: &IndexMap<String, V>,
) -> Vec<DeprecationWarning> {
    ctx.deprecated
        .iter()
        .filter(|name| decoded.contains_key(name.as_str()))
        .map(|name| {
            tracing::warn!(parameter = %name, "deprecated query parameter used");
            DeprecationWarning { name: name.clone() }
        })
        .collect()
}
