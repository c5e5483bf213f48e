// SPDX-License-Identifier: MIT

//! Named filters loaded from configuration
//!
//! A filter file maps names to expression text:
//!
//! ```yaml
//! filters:
//!   rust: "re='\\.rs$' && type=f"
//!   big-logs: "re=log$ && file-larger=1M"
//! ```

mod loader;
mod types;

pub use loader::FilterLoader;
pub use types::FilterFileDef;

use crate::error::BoolexprError;
use crate::expr::{Capability, Expression, OperandRegistry};
use std::collections::BTreeMap;
use std::path::Path;

/// Compiled filters, keyed by name
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: BTreeMap<String, Expression>,
}

impl FilterSet {
    /// Compile every filter. The first one that fails aborts the whole set.
    pub fn compile(def: &FilterFileDef, registry: &OperandRegistry) -> Result<Self, BoolexprError> {
        let mut filters = BTreeMap::new();
        for (name, text) in &def.filters {
            let expr = registry
                .parse(text)
                .map_err(|e| {
                    log::warn!("filter '{}' failed: {}", name, e);
                    BoolexprError::filter(name.as_str(), e)
                })?;
            log::debug!("compiled filter '{}': {}", name, expr);
            filters.insert(name.clone(), expr);
        }
        Ok(Self { filters })
    }

    /// Load and compile a filter file
    pub fn load<P: AsRef<Path>>(path: P, registry: &OperandRegistry) -> Result<Self, BoolexprError> {
        let def = FilterLoader::new().load_file(path)?;
        Self::compile(&def, registry)
    }

    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.filters.get(name)
    }

    /// Like `get`, but a missing filter is an error
    pub fn require(&self, name: &str) -> Result<&Expression, BoolexprError> {
        self.get(name)
            .ok_or_else(|| BoolexprError::FilterNotFound(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True if any filter needs the capability
    pub fn needs(&self, capability: Capability) -> bool {
        self.filters.values().any(|e| e.needs(capability))
    }
}
