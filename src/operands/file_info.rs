//! Filesystem paths as expression values

use crate::expr::{Capability, Expression, FileKind, Subject};
use chrono::{DateTime, Utc};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// A path, optionally with its `symlink_metadata`
#[derive(Debug, Clone)]
pub struct FileInfo {
    path: PathBuf,
    metadata: Option<Metadata>,
}

impl FileInfo {
    /// A path without metadata: only name and path are available
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            metadata: None,
        }
    }

    /// A path with its metadata loaded
    pub fn stat(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let metadata = fs::symlink_metadata(&path)?;
        Ok(Self {
            path,
            metadata: Some(metadata),
        })
    }

    /// Load metadata only if the expression reads something that needs it
    pub fn for_expression(path: impl Into<PathBuf>, expr: &Expression) -> io::Result<Self> {
        let needs_stat = Capability::ALL
            .into_iter()
            .any(|c| c.needs_metadata() && expr.needs(c));
        if needs_stat {
            Self::stat(path)
        } else {
            log::trace!("skipping stat for expression: {}", expr);
            Ok(Self::new(path))
        }
    }

    pub fn has_metadata(&self) -> bool {
        self.metadata.is_some()
    }
}

impl Subject for FileInfo {
    fn name(&self) -> Option<&str> {
        // `.` and `..` style paths have no file_name
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .or_else(|| self.path.to_str())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn file_type(&self) -> Option<FileKind> {
        let ft = self.metadata.as_ref()?.file_type();
        Some(if ft.is_symlink() {
            FileKind::Symlink
        } else if ft.is_dir() {
            FileKind::Dir
        } else if ft.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        })
    }

    #[cfg(unix)]
    fn mode(&self) -> Option<u32> {
        use std::os::unix::fs::PermissionsExt;
        self.metadata.as_ref().map(|m| m.permissions().mode())
    }

    fn mod_time(&self) -> Option<DateTime<Utc>> {
        let modified = self.metadata.as_ref()?.modified().ok()?;
        Some(DateTime::<Utc>::from(modified))
    }

    fn size(&self) -> Option<u64> {
        self.metadata.as_ref().map(|m| m.len())
    }
}
