// SPDX-License-Identifier: MIT

//! The operand contract and the runtime values operands are evaluated on
//!
//! An operand is an opaque predicate. The engine only calls the four
//! methods of [`Operand`]; what a predicate matches against is expressed
//! through the [`Subject`] accessors, each of which maps to one
//! [`Capability`] that callers can query before doing expensive work.

use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pieces of information an operand may need from the value it evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    Name,
    Path,
    FileType,
    FileMode,
    ModTime,
    Size,
    XAttr,
}

impl Capability {
    /// Every capability, in declaration order
    pub const ALL: [Capability; 7] = [
        Capability::Name,
        Capability::Path,
        Capability::FileType,
        Capability::FileMode,
        Capability::ModTime,
        Capability::Size,
        Capability::XAttr,
    ];

    /// True if providing this capability requires a stat() call
    pub fn needs_metadata(self) -> bool {
        matches!(
            self,
            Capability::FileType | Capability::FileMode | Capability::ModTime | Capability::Size
        )
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Name => write!(f, "name"),
            Capability::Path => write!(f, "path"),
            Capability::FileType => write!(f, "file-type"),
            Capability::FileMode => write!(f, "file-mode"),
            Capability::ModTime => write!(f, "mod-time"),
            Capability::Size => write!(f, "size"),
            Capability::XAttr => write!(f, "xattr"),
        }
    }
}

/// Coarse file type reported by a [`Subject`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Dir,
    Symlink,
    Other,
}

/// A runtime value an expression is evaluated against.
///
/// Every accessor defaults to `None`, meaning "this value does not carry
/// that information". Operands must treat `None` as a non-match.
pub trait Subject {
    fn name(&self) -> Option<&str> {
        None
    }

    fn path(&self) -> Option<&Path> {
        None
    }

    fn file_type(&self) -> Option<FileKind> {
        None
    }

    /// Unix permission bits
    fn mode(&self) -> Option<u32> {
        None
    }

    fn mod_time(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn size(&self) -> Option<u64> {
        None
    }

    fn xattr(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }
}

impl Subject for &str {
    fn name(&self) -> Option<&str> {
        Some(*self)
    }
}

impl Subject for String {
    fn name(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl Subject for &Path {
    fn name(&self) -> Option<&str> {
        self.file_name().and_then(|n| n.to_str())
    }

    fn path(&self) -> Option<&Path> {
        Some(*self)
    }
}

impl Subject for PathBuf {
    fn name(&self) -> Option<&str> {
        self.file_name().and_then(|n| n.to_str())
    }

    fn path(&self) -> Option<&Path> {
        Some(self.as_path())
    }
}

/// Error type returned by [`Operand::prepare`]
pub type PrepareError = Box<dyn Error + Send + Sync>;

/// Trait for predicates that can appear in an expression.
///
/// `prepare` is called exactly once, while the expression is built, and
/// returns the evaluation-ready operand that the expression keeps. `eval`
/// must never fail: any value it cannot interpret evaluates to `false`.
/// Implementations shared across threads must keep `eval` free of side
/// effects.
pub trait Operand: fmt::Display + fmt::Debug + Send + Sync {
    /// The registered name, e.g. `re`
    fn name(&self) -> &str;

    /// Validate or compile the configured value
    fn prepare(&self) -> Result<Arc<dyn Operand>, PrepareError>;

    /// Evaluate against one value
    fn eval(&self, value: &dyn Subject) -> bool;

    /// Capabilities this operand reads from the value
    fn capabilities(&self) -> &'static [Capability] {
        &[]
    }

    /// Whether this operand reads the given capability
    fn needs(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

fn is_special(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '&' | '|' | '\\' | '\'')
}

/// Write `name=value`, quoting or escaping the value so that the
/// tokenizer reads back exactly `value`.
pub fn fmt_operand(f: &mut fmt::Formatter<'_>, name: &str, value: &str) -> fmt::Result {
    write!(f, "{}=", name)?;
    if !value.chars().any(is_special) {
        return write!(f, "{}", value);
    }
    if !value.contains('\'') {
        return write!(f, "'{}'", value);
    }
    for c in value.chars() {
        if is_special(c) {
            write!(f, "\\")?;
        }
        write!(f, "{}", c)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shown(&'static str);

    impl fmt::Display for Shown {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            fmt_operand(f, "re", self.0)
        }
    }

    #[test]
    fn test_fmt_operand_bare() {
        assert_eq!(Shown("foo.*").to_string(), "re=foo.*");
        assert_eq!(Shown("").to_string(), "re=");
    }

    #[test]
    fn test_fmt_operand_quotes_specials() {
        assert_eq!(Shown("a b").to_string(), "re='a b'");
        assert_eq!(Shown("x|y").to_string(), "re='x|y'");
    }

    #[test]
    fn test_fmt_operand_escapes_when_quote_present() {
        assert_eq!(Shown("it's here").to_string(), r"re=it\'s\ here");
    }

    #[test]
    fn test_subject_defaults() {
        let s = "hello";
        assert_eq!(Subject::name(&s), Some("hello"));
        assert_eq!(Subject::size(&s), None);
        assert_eq!(Subject::xattr(&s, "user.tag"), None);

        let p = PathBuf::from("/tmp/notes.txt");
        assert_eq!(Subject::name(&p), Some("notes.txt"));
        assert_eq!(Subject::path(&p), Some(Path::new("/tmp/notes.txt")));
    }

    #[test]
    fn test_capability_metadata() {
        assert!(Capability::Size.needs_metadata());
        assert!(!Capability::Name.needs_metadata());
        assert_eq!(Capability::ModTime.to_string(), "mod-time");
    }
}
