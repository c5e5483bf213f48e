// SPDX-License-Identifier: MIT

use crate::expr::{fmt_operand, Capability, FileKind, Operand, PrepareError, Subject};
use std::fmt;
use std::sync::Arc;

/// `type=<f|d|l>`: regular file, directory or symbolic link
#[derive(Debug, Clone)]
pub struct FileTypeIs {
    raw: String,
    kind: Option<FileKind>,
}

impl FileTypeIs {
    pub const NAME: &'static str = "type";

    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            kind: None,
        }
    }

    pub fn factory(_name: &str, value: &str) -> Arc<dyn Operand> {
        Arc::new(Self::new(value))
    }
}

fn parse_kind(raw: &str) -> Option<FileKind> {
    match raw {
        "f" => Some(FileKind::File),
        "d" => Some(FileKind::Dir),
        "l" => Some(FileKind::Symlink),
        _ => None,
    }
}

impl fmt::Display for FileTypeIs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_operand(f, Self::NAME, &self.raw)
    }
}

impl Operand for FileTypeIs {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn prepare(&self) -> Result<Arc<dyn Operand>, PrepareError> {
        let kind =
            parse_kind(&self.raw).ok_or_else(|| format!("invalid file type: {}", self.raw))?;
        Ok(Arc::new(Self {
            raw: self.raw.clone(),
            kind: Some(kind),
        }))
    }

    fn eval(&self, value: &dyn Subject) -> bool {
        match (self.kind, value.file_type()) {
            (Some(want), Some(got)) => want == got,
            _ => false,
        }
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::FileType]
    }
}
