// SPDX-License-Identifier: MIT

//! Boolean expressions over named operands
//!
//! Expressions combine operands with `&&`, `||`, `!` and brackets:
//! - `re=foo`
//! - `re=foo || re=bar`
//! - `!re=foo && (type=d || newer=2024-01-01)`
//!
//! Text goes through the tokenizer and the operand registry to become
//! items; items go through the grammar builder to become an `Expression`.

mod ast;
mod evaluator;
mod operand;
mod parser;
mod registry;
mod tokenizer;

pub use ast::{Expression, Item};
pub use evaluator::evaluate;
pub use operand::{fmt_operand, Capability, FileKind, Operand, PrepareError, Subject};
pub use parser::build;
pub use registry::{OperandFactory, OperandRegistry};
pub use tokenizer::{tokenize, Token, TokenKind};
