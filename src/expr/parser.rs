// SPDX-License-Identifier: MIT

//! Grammar builder
//!
//! Turns a flat sequence of items into a validated `Expression`:
//! - brackets are balance-checked up front
//! - each operand is prepared exactly once
//! - bracketed groups are consumed recursively from the same cursor and
//!   stored as `Item::SubExpression`
//! - every level must alternate operand and operator positions, with `!`
//!   allowed only in front of an operand position

use super::ast::{format_items, Expression, Item};
use crate::error::ExprError;

impl Expression {
    /// Build an expression from items. No items yields the empty
    /// expression, which matches nothing.
    pub fn new(items: impl IntoIterator<Item = Item>) -> Result<Self, ExprError> {
        build(items.into_iter().collect())
    }
}

/// Build an expression from items
pub fn build(items: Vec<Item>) -> Result<Expression, ExprError> {
    if items.is_empty() {
        return Ok(Expression::default());
    }
    check_brackets(&items)?;

    let count = items.len();
    let mut cursor = items.into_iter();
    let top = build_level(&mut cursor, false)?;
    check_well_formed(&top)?;

    let expr = Expression::from_items(top);
    log::debug!("built expression from {} items: {}", count, expr);
    Ok(expr)
}

fn check_brackets(items: &[Item]) -> Result<(), ExprError> {
    let mut depth: usize = 0;
    for item in items {
        match item {
            Item::LeftBracket => depth += 1,
            Item::RightBracket => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(ExprError::UnbalancedBrackets)?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ExprError::UnbalancedBrackets);
    }
    Ok(())
}

/// Consume items up to the end of input, or up to and including the `)`
/// that closes this level when `nested` is set.
fn build_level(
    cursor: &mut std::vec::IntoIter<Item>,
    nested: bool,
) -> Result<Vec<Item>, ExprError> {
    let mut expr: Vec<Item> = Vec::new();

    while let Some(item) = cursor.next() {
        match item {
            Item::Operand(op) => {
                let prepared = op.prepare().map_err(ExprError::Operand)?;
                expr.push(Item::Operand(prepared));
            }
            Item::SubExpression(ref sub) if sub.is_empty() => {
                return Err(ExprError::MissingLeftOperand(Item::RightBracket.to_string()));
            }
            Item::SubExpression(_) => expr.push(item),
            Item::And | Item::Or => {
                expect_left_operand(&expr, &item)?;
                expr.push(item);
            }
            Item::Not => {
                if let Some(prev) = expr.last() {
                    if !prev.is_binary_operator() {
                        return Err(ExprError::MisplacedNegation(prev.to_string()));
                    }
                }
                expr.push(item);
            }
            Item::LeftBracket => {
                if let Some(prev) = expr.last() {
                    if !prev.is_binary_operator() && !matches!(prev, Item::Not) {
                        return Err(ExprError::MissingOperator);
                    }
                }
                let sub = build_level(cursor, true)?;
                expr.push(Item::SubExpression(Expression::from_items(sub)));
            }
            Item::RightBracket => {
                expect_left_operand(&expr, &item)?;
                if !nested {
                    return Err(ExprError::UnbalancedBrackets);
                }
                check_well_formed(&expr)?;
                return Ok(expr);
            }
        }
    }

    if nested {
        return Err(ExprError::UnbalancedBrackets);
    }
    Ok(expr)
}

fn expect_left_operand(expr: &[Item], item: &Item) -> Result<(), ExprError> {
    match expr.last() {
        None => Err(ExprError::MissingLeftOperand(item.to_string())),
        Some(prev) if !prev.is_operand_position() => {
            Err(ExprError::MissingOperand(item.to_string()))
        }
        Some(_) => Ok(()),
    }
}

/// Operand positions and binary operators must alternate, starting and
/// ending with an operand position; `!` may only precede an operand position.
fn check_well_formed(items: &[Item]) -> Result<(), ExprError> {
    let mut want_operand = true;
    for item in items {
        match item {
            Item::Not if want_operand => {}
            i if want_operand && i.is_operand_position() => want_operand = false,
            i if !want_operand && i.is_binary_operator() => want_operand = true,
            _ => return Err(ExprError::IncompleteExpression(format_items(items))),
        }
    }
    if want_operand {
        return Err(ExprError::IncompleteExpression(format_items(items)));
    }
    Ok(())
}
