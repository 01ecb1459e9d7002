#![deny(missing_docs)]

//! # Query Pipeline
//!
//! Runs a request's raw query through the whole engine:
//! style decoding, type coercion, required checks, deprecation warnings.

use crate::coercer::{coerce, passthrough};
use crate::context::QueryContext;
use crate::decoder::decode;
use crate::error::QueryResult;
use crate::raw::RawQuery;
use crate::types::TypedValue;
use crate::validate::{annotate_deprecated, check_required, DeprecationWarning};
use indexmap::IndexMap;

/// The outcome of a successful decode.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedQuery {
    /// Typed values of the declared parameters that were present.
    pub params: IndexMap<String, TypedValue>,
    /// Deprecated parameters that were used.
    pub warnings: Vec<DeprecationWarning>,
}

impl QueryContext {
    /// Decodes one request's query.
    ///
    /// Any malformed parameter fails the whole decode; nothing is partially applied.
    pub fn process(&self, raw: &RawQuery) -> QueryResult<DecodedQuery> {
        let params = decode(self, raw)?
            .into_iter()
            .map(|(name, value)| {
                let typed = match self.spec(&name) {
                    Some(spec) => coerce(spec, value)?,
                    None => passthrough(value),
                };
                Ok((name, typed))
            })
            .collect::<QueryResult<IndexMap<_, _>>>()?;

        check_required(self, &params)?;
        let warnings = annotate_deprecated(self, &params);
        Ok(DecodedQuery { params, warnings })
    }

    /// Parses and decodes a raw query string.
    pub fn process_str(&self, query: &str) -> QueryResult<DecodedQuery> {
        self.process(&RawQuery::parse(query)?)
    }
}
