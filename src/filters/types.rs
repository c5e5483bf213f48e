//! Filter file type definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A filter file: named expressions in textual form
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FilterFileDef {
    /// Optional description of the file
    #[serde(default)]
    pub description: String,
    /// Filter name to expression text
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}
