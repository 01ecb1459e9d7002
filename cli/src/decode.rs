#![deny(missing_docs)]

//! # Decode Command
//!
//! Decodes one query string against a parameter declaration file and prints
//! the typed parameters plus any deprecation warnings as JSON.

use crate::error::{CliError, CliResult};
use oas_query_core::{parse_parameter_list, QueryContext, RawQuery, WARNING_HEADER};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::PathBuf;

/// Arguments for the decode command.
#[derive(clap::Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Path to the parameter declarations (JSON or YAML list, or an operation object).
    #[clap(long, env = "OAS_QUERY_PARAMS")]
    pub params: PathBuf,

    /// Raw query string, e.g. `tags=a,b&filter[status]=active`.
    #[clap(long, default_value = "")]
    pub query: String,

    /// Extra already-decoded pairs appended after `--query`.
    /// Format: `"key=value"`.
    #[clap(long = "pair", value_parser = parse_key_val)]
    pub pairs: Vec<(String, String)>,
}

/// Helper to parse "key=value" arguments.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{}`", s))
}

#[derive(Serialize)]
struct DecodeOutput {
    params: JsonValue,
    headers: Vec<(String, String)>,
}

/// Executes the decode and returns the pretty-printed JSON report.
pub fn execute(args: &DecodeArgs) -> CliResult<String> {
    if !args.params.exists() {
        return Err(CliError::General(format!(
            "Parameter file not found: {:?}",
            args.params
        )));
    }

    let document = fs::read_to_string(&args.params)?;
    let declarations = parse_parameter_list(&document)?;
    let ctx = QueryContext::build(&declarations)?;

    let mut raw = RawQuery::parse(&args.query)?;
    for (key, value) in &args.pairs {
        raw.push(key.clone(), value.clone());
    }
    tracing::debug!(pairs = raw.len(), "decoding query");

    let decoded = ctx.process(&raw)?;
    let output = DecodeOutput {
        params: serde_json::to_value(&decoded.params)?,
        headers: decoded
            .warnings
            .iter()
            .map(|w| (WARNING_HEADER.to_string(), w.header_value()))
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oas_query_core::QueryError;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    const PARAMS: &str = r#"
- name: id
  in: query
  required: true
  schema: { type: integer }
- name: old
  in: query
  deprecated: true
- name: filter
  in: query
  style: deepObject
  schema: { type: object, additionalProperties: { type: boolean } }
"#;

    fn args(dir: &std::path::Path, query: &str) -> DecodeArgs {
        let params = dir.join("params.yaml");
        fs::write(&params, PARAMS).unwrap();
        DecodeArgs {
            params,
            query: query.to_string(),
            pairs: vec![],
        }
    }

    #[test]
    fn test_decode_prints_params_and_warnings() {
        let dir = tempdir().unwrap();
        let mut args = args(dir.path(), "id=7&old=x");
        args.pairs.push(("filter[on]".into(), "true".into()));

        let out: JsonValue = serde_json::from_str(&execute(&args).unwrap()).unwrap();
        assert_eq!(
            out,
            json!({
                "params": {"id": 7, "old": "x", "filter": {"on": true}},
                "headers": [["warning", "299 - the query parameter `old` is deprecated."]]
            })
        );
    }

    #[test]
    fn test_decode_missing_required() {
        let dir = tempdir().unwrap();
        let err = execute(&args(dir.path(), "old=x")).unwrap_err();
        assert!(matches!(err, CliError::Query(QueryError::MissingRequired(_))));
    }

    #[test]
    fn test_decode_missing_file() {
        let dir = tempdir().unwrap();
        let args = DecodeArgs {
            params: dir.path().join("nope.yaml"),
            query: String::new(),
            pairs: vec![],
        };
        assert!(matches!(execute(&args), Err(CliError::General(_))));
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("a[b]=c=d").unwrap(),
            ("a[b]".to_string(), "c=d".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
    }
}
