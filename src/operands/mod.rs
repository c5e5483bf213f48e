// SPDX-License-Identifier: MIT

//! Built-in operands
//!
//! - `re=<regex>` - name matches a regular expression
//! - `type=<f|d|l>` - file type
//! - `newer=<time>` - modified after a time
//! - `file-larger=<size>`, `file-smaller=<size>` - regular file size bounds

mod file_info;
mod file_type;
mod newer;
mod pattern;
mod size;

pub use file_info::FileInfo;
pub use file_type::FileTypeIs;
pub use newer::Newer;
pub use pattern::RegexMatch;
pub use size::FileSize;

use crate::expr::OperandRegistry;

/// Register every built-in operand
pub fn register_builtins(registry: &OperandRegistry) {
    registry.register(RegexMatch::NAME, RegexMatch::factory);
    registry.register(FileTypeIs::NAME, FileTypeIs::factory);
    registry.register(Newer::NAME, Newer::factory);
    registry.register(FileSize::LARGER, FileSize::larger_factory);
    registry.register(FileSize::SMALLER, FileSize::smaller_factory);
}

impl OperandRegistry {
    /// A registry with the built-in operands
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        register_builtins(&registry);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_listed_in_order() {
        let names: Vec<String> = OperandRegistry::with_builtins()
            .list()
            .iter()
            .map(|o| o.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["file-larger", "file-smaller", "newer", "re", "type"]
        );
    }

    #[test]
    fn test_builtin_prepare_errors_surface() {
        let registry = OperandRegistry::with_builtins();
        assert_eq!(
            registry.parse("re=a && type=q").unwrap_err().to_string(),
            "invalid file type: q"
        );
        assert_eq!(
            registry.parse("newer=later").unwrap_err().to_string(),
            "invalid time: later"
        );
    }
}
