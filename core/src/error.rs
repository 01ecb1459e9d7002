#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `QueryError` enum used across the engine.
//!
//! Errors fall into two classes:
//! - configuration errors, raised while a `QueryContext` is being built;
//! - request-time errors, raised while a single query string is decoded.

use derive_more::{Display, From};
use std::fmt;

/// The names of required parameters absent from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRequired {
    /// Missing parameter names, sorted.
    pub names: Vec<String>,
}

impl fmt::Display for MissingRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.names.iter().map(|n| format!("`{}`", n)).collect();
        write!(
            f,
            "missing required query parameter(s): {}",
            quoted.join(", ")
        )
    }
}

/// The engine error enum.
///
/// Only `serde_yaml` errors convert via `From`; every `String` variant
/// must be constructed explicitly so the error class is never guessed.
#[derive(Debug, Display, From)]
pub enum QueryError {
    /// Invalid parameter declarations (unknown type, style or pattern).
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Configuration(String),

    /// Malformed raw input, such as a dangling key in a delimited object.
    #[from(ignore)]
    #[display("Format Error: {_0}")]
    Format(String),

    /// A value that none of its candidate types accepts.
    #[from(ignore)]
    #[display("Validation Error: {_0}")]
    Validation(String),

    /// Required parameters absent from the request.
    #[from(ignore)]
    #[display("{_0}")]
    MissingRequired(MissingRequired),

    /// A declaration document that failed to deserialize.
    #[display("Parse Error: {_0}")]
    Parse(serde_yaml::Error),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for QueryError {}

impl QueryError {
    /// Whether the error was raised while building a `QueryContext`.
    pub fn is_configuration(&self) -> bool {
        matches!(self, QueryError::Configuration(_) | QueryError::Parse(_))
    }

    /// The HTTP status a caller should answer with.
    ///
    /// Request-time failures are the client's fault (`400`); configuration
    /// failures mean the route itself is broken (`500`).
    pub fn status_code(&self) -> u16 {
        if self.is_configuration() {
            500
        } else {
            400
        }
    }
}

/// Helper type alias for Result using QueryError.
pub type QueryResult<T> = Result<T, QueryError>;
