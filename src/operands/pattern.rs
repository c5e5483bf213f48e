// SPDX-License-Identifier: MIT

use crate::expr::{fmt_operand, Capability, Operand, PrepareError, Subject};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// `re=<pattern>`: the value's name contains a match for the pattern
#[derive(Debug, Clone)]
pub struct RegexMatch {
    pattern: String,
    regex: Option<Regex>,
}

impl RegexMatch {
    pub const NAME: &'static str = "re";

    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            regex: None,
        }
    }

    pub fn factory(_name: &str, value: &str) -> Arc<dyn Operand> {
        Arc::new(Self::new(value))
    }
}

impl fmt::Display for RegexMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_operand(f, Self::NAME, &self.pattern)
    }
}

impl Operand for RegexMatch {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn prepare(&self) -> Result<Arc<dyn Operand>, PrepareError> {
        let regex = Regex::new(&self.pattern)?;
        Ok(Arc::new(Self {
            pattern: self.pattern.clone(),
            regex: Some(regex),
        }))
    }

    fn eval(&self, value: &dyn Subject) -> bool {
        match (&self.regex, value.name()) {
            (Some(re), Some(name)) => re.is_match(name),
            _ => false,
        }
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Name]
    }
}
