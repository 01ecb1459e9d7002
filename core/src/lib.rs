#![deny(missing_docs)]

//! # OAS Query Core
//!
//! Schema-directed decoding of OpenAPI query parameters.
//!
//! A `QueryContext` is built once per operation from its parameter
//! declarations, then shared read-only by every request:
//!
//! ```
//! use oas_query_core::{parse_parameter_list, QueryContext, TypedValue};
//!
//! let params = parse_parameter_list(r#"
//! - name: limit
//!   in: query
//!   required: true
//!   schema: { type: integer }
//! - name: tags
//!   in: query
//!   style: pipeDelimited
//!   schema: { type: array }
//! "#).unwrap();
//! let ctx = QueryContext::build(&params).unwrap();
//! let decoded = ctx.process_str("limit=10&tags=a|b").unwrap();
//! assert_eq!(decoded.params["limit"], TypedValue::Integer(10));
//! ```

/// Shared error types.
pub mod error;

/// Type tags and typed values.
pub mod types;

/// Parameter declaration shims.
pub mod declaration;

/// Per-parameter decoding plans.
pub mod spec;

/// Per-operation decoding context.
pub mod context;

/// Raw query multimap.
pub mod raw;

/// Style decoding.
pub mod decoder;

/// Type coercion.
pub mod coercer;

/// Required and deprecation checks.
pub mod validate;

/// End-to-end request decoding.
pub mod pipeline;

pub use context::QueryContext;
pub use declaration::{
    parse_parameter_list, ParameterDeclaration, SchemaDeclaration, SubSchema, TypeDeclaration,
};
pub use decoder::DecodedValue;
pub use error::{MissingRequired, QueryError, QueryResult};
pub use pipeline::DecodedQuery;
pub use raw::RawQuery;
pub use spec::{ElementPlan, InnerPlan, ParameterSpec, PropertyPlan, Style};
pub use types::{TypeList, TypeTag, TypedValue};
pub use validate::{DeprecationWarning, WARNING_HEADER};
