#![deny(missing_docs)]

//! # Inspect Command
//!
//! Builds the query context of a declaration file and prints each
//! parameter's decoding plan. Configuration errors surface here.

use crate::error::CliResult;
use oas_query_core::{parse_parameter_list, InnerPlan, QueryContext, TypeList};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Arguments for the inspect command.
#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the parameter declarations.
    #[clap(long, env = "OAS_QUERY_PARAMS")]
    pub params: PathBuf,
}

#[derive(Serialize)]
struct PlanReport {
    name: String,
    types: Option<TypeList>,
    style: Option<String>,
    required: bool,
    deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix_items: Option<Vec<TypeList>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Option<TypeList>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<Vec<(String, TypeList)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern_properties: Option<Vec<(String, TypeList)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_properties: Option<TypeList>,
}

impl PlanReport {
    fn new(ctx: &QueryContext, name: &str) -> Self {
        let spec = ctx.spec(name);
        let mut report = PlanReport {
            name: name.to_string(),
            types: spec.map(|s| s.types.clone()),
            style: spec
                .and_then(|s| s.style)
                .map(|s| s.to_string())
                .or_else(|| ctx.is_deep_object(name).then(|| "deepObject".to_string())),
            required: ctx.required.contains(name),
            deprecated: ctx.deprecated.contains(name),
            prefix_items: None,
            items: None,
            properties: None,
            pattern_properties: None,
            additional_properties: None,
        };
        match spec.and_then(|s| s.inner.as_ref()) {
            Some(InnerPlan::Elements(plan)) => {
                report.prefix_items = Some(plan.prefix.clone());
                report.items = Some(plan.items.clone());
            }
            Some(InnerPlan::Properties(plan)) => {
                report.properties = Some(
                    plan.properties
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                );
                report.pattern_properties = Some(
                    plan.patterns
                        .iter()
                        .map(|(re, v)| (re.as_str().to_string(), v.clone()))
                        .collect(),
                );
                report.additional_properties = Some(plan.additional.clone());
            }
            None => {}
        }
        report
    }
}

/// Executes the inspection and returns the pretty-printed JSON plans.
pub fn execute(args: &InspectArgs) -> CliResult<String> {
    let document = fs::read_to_string(&args.params)?;
    let declarations = parse_parameter_list(&document)?;
    let ctx = QueryContext::build(&declarations)?;

    let reports: Vec<PlanReport> = ctx
        .declared
        .iter()
        .map(|name| PlanReport::new(&ctx, name))
        .collect();
    Ok(serde_json::to_string_pretty(&reports)?)
}
