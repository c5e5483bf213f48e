// SPDX-License-Identifier: MIT

use crate::expr::{fmt_operand, Capability, FileKind, Operand, PrepareError, Subject};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

static SIZE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+)\s*([kmgt])?i?b?$").expect("invalid regex"));

/// Parse sizes such as `512`, `10K`, `2MiB` or `1gb`. Suffixes are binary.
pub(crate) fn parse_size(s: &str) -> Option<u64> {
    let caps = SIZE_REGEX.captures(s.trim())?;
    let count: u64 = caps.get(1)?.as_str().parse().ok()?;
    let shift = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        None => 0,
        Some(unit) => match unit.as_str() {
            "k" => 10,
            "m" => 20,
            "g" => 30,
            _ => 40,
        },
    };
    count.checked_mul(1u64 << shift)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Larger,
    Smaller,
}

/// `file-larger=<size>` and `file-smaller=<size>`: regular files strictly
/// above or below a size
#[derive(Debug, Clone)]
pub struct FileSize {
    bound: Bound,
    raw: String,
    bytes: Option<u64>,
}

impl FileSize {
    pub const LARGER: &'static str = "file-larger";
    pub const SMALLER: &'static str = "file-smaller";

    pub fn larger(raw: impl Into<String>) -> Self {
        Self {
            bound: Bound::Larger,
            raw: raw.into(),
            bytes: None,
        }
    }

    pub fn smaller(raw: impl Into<String>) -> Self {
        Self {
            bound: Bound::Smaller,
            raw: raw.into(),
            bytes: None,
        }
    }

    pub fn larger_factory(_name: &str, value: &str) -> Arc<dyn Operand> {
        Arc::new(Self::larger(value))
    }

    pub fn smaller_factory(_name: &str, value: &str) -> Arc<dyn Operand> {
        Arc::new(Self::smaller(value))
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_operand(f, self.name(), &self.raw)
    }
}

impl Operand for FileSize {
    fn name(&self) -> &str {
        match self.bound {
            Bound::Larger => Self::LARGER,
            Bound::Smaller => Self::SMALLER,
        }
    }

    fn prepare(&self) -> Result<Arc<dyn Operand>, PrepareError> {
        let bytes = parse_size(&self.raw).ok_or_else(|| format!("invalid size: {}", self.raw))?;
        Ok(Arc::new(Self {
            bound: self.bound,
            raw: self.raw.clone(),
            bytes: Some(bytes),
        }))
    }

    fn eval(&self, value: &dyn Subject) -> bool {
        if value.file_type() != Some(FileKind::File) {
            return false;
        }
        match (self.bytes, value.size()) {
            (Some(limit), Some(size)) => match self.bound {
                Bound::Larger => size > limit,
                Bound::Smaller => size < limit,
            },
            _ => false,
        }
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::FileType, Capability::Size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Entry {
        kind: FileKind,
        size: u64,
    }

    impl Subject for Entry {
        fn file_type(&self) -> Option<FileKind> {
            Some(self.kind)
        }

        fn size(&self) -> Option<u64> {
            Some(self.size)
        }
    }

    fn file(size: u64) -> Entry {
        Entry {
            kind: FileKind::File,
            size,
        }
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("512"), Some(512));
        assert_eq!(parse_size("10K"), Some(10 * 1024));
        assert_eq!(parse_size("2MiB"), Some(2 * 1024 * 1024));
        assert_eq!(parse_size("1gb"), Some(1u64 << 30));
        assert_eq!(parse_size("3T"), Some(3u64 << 40));
        assert_eq!(parse_size("12Q"), None);
        assert_eq!(parse_size(""), None);
    }

    #[test]
    fn test_larger_and_smaller() {
        let larger = FileSize::larger("1K").prepare().unwrap();
        let smaller = FileSize::smaller("1K").prepare().unwrap();

        assert!(larger.eval(&file(2048)));
        assert!(!larger.eval(&file(1024)));
        assert!(smaller.eval(&file(10)));
        assert!(!smaller.eval(&file(1024)));
    }

    #[test]
    fn test_directories_never_match() {
        let larger = FileSize::larger("0").prepare().unwrap();
        let dir = Entry {
            kind: FileKind::Dir,
            size: 4096,
        };
        assert!(!larger.eval(&dir));
    }

    #[test]
    fn test_invalid_size() {
        let err = FileSize::smaller("big").prepare().unwrap_err();
        assert_eq!(err.to_string(), "invalid size: big");
    }

    #[test]
    fn test_names() {
        assert_eq!(FileSize::larger("1M").to_string(), "file-larger=1M");
        assert_eq!(FileSize::smaller("").to_string(), "file-smaller=");
        assert!(FileSize::larger("1").needs(Capability::Size));
    }
}
