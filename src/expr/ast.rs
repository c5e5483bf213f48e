// SPDX-License-Identifier: MIT

//! Items and expressions
//!
//! An `Expression` is a flat sequence of `Item`s at each nesting level;
//! bracketed groups are stored as a single `Item::SubExpression`.

use super::operand::{Capability, Operand};
use std::fmt;
use std::sync::Arc;

/// One element of an expression
#[derive(Debug, Clone)]
pub enum Item {
    /// &&
    And,
    /// ||
    Or,
    /// !
    Not,
    /// (
    LeftBracket,
    /// )
    RightBracket,
    /// A named predicate
    Operand(Arc<dyn Operand>),
    /// A bracketed group, produced by the grammar builder
    SubExpression(Expression),
}

impl Item {
    /// Wrap an operand
    pub fn operand(op: impl Operand + 'static) -> Self {
        Item::Operand(Arc::new(op))
    }

    /// True for items that fill an operand slot
    pub(crate) fn is_operand_position(&self) -> bool {
        matches!(self, Item::Operand(_) | Item::SubExpression(_))
    }

    /// True for `&&` and `||`
    pub(crate) fn is_binary_operator(&self) -> bool {
        matches!(self, Item::And | Item::Or)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::And => write!(f, "&&"),
            Item::Or => write!(f, "||"),
            Item::Not => write!(f, "!"),
            Item::LeftBracket => write!(f, "("),
            Item::RightBracket => write!(f, ")"),
            Item::Operand(op) => write!(f, "{}", op),
            Item::SubExpression(sub) => write!(f, "({})", sub),
        }
    }
}

/// Render items the way error messages show them: `[re=a ||]`
pub(crate) fn format_items(items: &[Item]) -> String {
    let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    format!("[{}]", parts.join(" "))
}

/// A validated, immutable boolean expression.
///
/// The empty expression is valid and matches nothing.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    items: Vec<Item>,
}

impl Expression {
    /// Expressions are only constructed by the grammar builder
    pub(crate) fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// The items at this level
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True if any operand, at any depth, needs the capability
    pub fn needs(&self, capability: Capability) -> bool {
        self.items.iter().any(|item| match item {
            Item::Operand(op) => op.needs(capability),
            Item::SubExpression(sub) => sub.needs(capability),
            _ => false,
        })
    }

    /// All capabilities needed by this expression, in declaration order
    pub fn capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.needs(*c))
            .collect()
    }

    /// Every operand, depth first
    pub fn operands(&self) -> Vec<Arc<dyn Operand>> {
        let mut out = Vec::new();
        self.collect_operands(&mut out);
        out
    }

    fn collect_operands(&self, out: &mut Vec<Arc<dyn Operand>>) {
        for item in &self.items {
            match item {
                Item::Operand(op) => out.push(Arc::clone(op)),
                Item::SubExpression(sub) => sub.collect_operands(out),
                _ => {}
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            write!(f, "{}", item)?;
            // negation sits flush against its operand
            if i + 1 < self.items.len() && !matches!(item, Item::Not) {
                write!(f, " ")?;
            }
        }
        Ok(())
    }
}
