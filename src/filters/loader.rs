//! Filter loader - YAML file loading and parsing

use super::types::FilterFileDef;
use crate::error::BoolexprError;
use std::fs;
use std::path::Path;

/// Loads filter definitions from YAML files
pub struct FilterLoader;

impl FilterLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a filter definition from a YAML file
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FilterFileDef, BoolexprError> {
        let path = path.as_ref();
        log::debug!("loading filters from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse a filter definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<FilterFileDef, BoolexprError> {
        let def: FilterFileDef = serde_yaml::from_str(content)?;
        Ok(def)
    }
}

impl Default for FilterLoader {
    fn default() -> Self {
        Self::new()
    }
}
