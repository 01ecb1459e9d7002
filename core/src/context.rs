#![deny(missing_docs)]

//! # Query Context
//!
//! Folds an operation's parameter declarations into the immutable
//! `QueryContext` shared by every request to that operation.

use crate::declaration::ParameterDeclaration;
use crate::error::QueryResult;
use crate::spec::ParameterSpec;
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeSet;

/// The decoding plan of an operation's query parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    /// Specs of parameters that declare a schema type.
    pub specs: IndexMap<String, ParameterSpec>,
    /// Every declared query parameter name, typed or not.
    pub declared: IndexSet<String>,
    /// Names that must be present.
    pub required: BTreeSet<String>,
    /// Names that trigger a deprecation warning.
    pub deprecated: BTreeSet<String>,
    /// Names decoded from `name[key]=value` entries.
    pub deep_object_keys: BTreeSet<String>,
}

impl QueryContext {
    /// Builds a context from an ordered declaration list.
    ///
    /// Declarations located outside the query string are skipped. When two
    /// declarations share a name, the later spec replaces the earlier one.
    pub fn build(declarations: &[ParameterDeclaration]) -> QueryResult<Self> {
        declarations
            .iter()
            .filter(|d| d.is_query())
            .try_fold(QueryContext::default(), |mut ctx, declaration| {
                ctx.add(declaration)?;
                Ok(ctx)
            })
    }

    fn add(&mut self, declaration: &ParameterDeclaration) -> QueryResult<()> {
        let spec = ParameterSpec::build(declaration)?;
        let name = declaration.name.clone();

        if declaration.required {
            self.required.insert(name.clone());
        }
        if declaration.deprecated {
            self.deprecated.insert(name.clone());
        }

        // A repeated name replaces the earlier decoding plan entirely.
        if !self.declared.insert(name.clone()) {
            tracing::debug!(parameter = %name, "duplicate query parameter overwrites earlier declaration");
        }
        if declaration.style.as_deref() == Some("deepObject") {
            self.deep_object_keys.insert(name.clone());
        } else {
            self.deep_object_keys.remove(&name);
        }
        match spec {
            Some(spec) => {
                self.specs.insert(name, spec);
            }
            None => {
                self.specs.shift_remove(&name);
            }
        }
        Ok(())
    }

    /// The spec of `name`, if it declares a type.
    pub fn spec(&self, name: &str) -> Option<&ParameterSpec> {
        self.specs.get(name)
    }

    /// Whether `name` uses the `deepObject` style.
    pub fn is_deep_object(&self, name: &str) -> bool {
        self.deep_object_keys.contains(name)
    }
}
