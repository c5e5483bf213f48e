// SPDX-License-Identifier: MIT

use crate::expr::{fmt_operand, Capability, Operand, PrepareError, Subject};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// `newer=<time>`: modified strictly after the given time.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD`; the last two
/// are taken as UTC.
#[derive(Debug, Clone)]
pub struct Newer {
    raw: String,
    after: Option<DateTime<Utc>>,
}

impl Newer {
    pub const NAME: &'static str = "newer";

    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            after: None,
        }
    }

    pub fn factory(_name: &str, value: &str) -> Arc<dyn Operand> {
        Arc::new(Self::new(value))
    }
}

pub(crate) fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl fmt::Display for Newer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_operand(f, Self::NAME, &self.raw)
    }
}

impl Operand for Newer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn prepare(&self) -> Result<Arc<dyn Operand>, PrepareError> {
        let after = parse_time(&self.raw).ok_or_else(|| format!("invalid time: {}", self.raw))?;
        Ok(Arc::new(Self {
            raw: self.raw.clone(),
            after: Some(after),
        }))
    }

    fn eval(&self, value: &dyn Subject) -> bool {
        match (self.after, value.mod_time()) {
            (Some(after), Some(modified)) => modified > after,
            _ => false,
        }
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::ModTime]
    }
}
