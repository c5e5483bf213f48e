// SPDX-License-Identifier: MIT

//! boolexpr - boolean expressions over named predicates
//!
//! ```
//! use boolexpr::OperandRegistry;
//!
//! let registry = OperandRegistry::with_builtins();
//! let expr = registry.parse("re=foo && !(re=bar || re=baz)").unwrap();
//! assert!(expr.eval(&"food"));
//! assert!(!expr.eval(&"foobar"));
//! ```

pub mod error;
pub mod expr;
pub mod filters;
pub mod operands;

pub use error::{BoolexprError, ExprError};
pub use expr::{Capability, Expression, Item, Operand, OperandRegistry, Subject};
pub use operands::FileInfo;
