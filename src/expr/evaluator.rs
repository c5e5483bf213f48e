// SPDX-License-Identifier: MIT

//! Expression evaluator
//!
//! Items are combined strictly left to right with no precedence between
//! `&&` and `||`: `a && b || c` is `(a && b) || c` and `a || b && c` is
//! `(a || b) && c`, except that a `||` which has produced `true` ends the
//! level immediately. `!` binds to the single operand or bracketed group
//! that follows it.

use super::ast::{Expression, Item};
use super::operand::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    And,
    Or,
    Not,
}

/// Working state for one level: at most two values and two operators
/// (a binary operator followed by a negation) are ever pending.
#[derive(Debug, Default)]
struct Pending {
    values: [bool; 2],
    nvalues: usize,
    ops: [Option<Op>; 2],
    nops: usize,
}

impl Pending {
    fn push_value(&mut self, v: bool) {
        if self.nvalues == self.values.len() {
            panic!("too many pending values: grammar builder accepted an invalid expression");
        }
        self.values[self.nvalues] = v;
        self.nvalues += 1;
    }

    fn push_op(&mut self, op: Op) {
        if self.nops == self.ops.len() {
            panic!("too many pending operators: grammar builder accepted an invalid expression");
        }
        self.ops[self.nops] = Some(op);
        self.nops += 1;
    }

    fn pop_op(&mut self) -> Option<Op> {
        if self.nops == 0 {
            return None;
        }
        self.nops -= 1;
        self.ops[self.nops].take()
    }

    fn last_op(&self) -> Option<Op> {
        self.nops.checked_sub(1).and_then(|i| self.ops[i])
    }

    /// A single settled `true` on the left of a `||`
    fn holds_true(&self) -> bool {
        self.nvalues == 1 && self.nops == 0 && self.values[0]
    }

    /// Resolve whatever can be resolved. Returns true when an `||` has
    /// produced `true` and the level is decided.
    fn reduce(&mut self) -> bool {
        if self.nvalues == 1 && self.nops == 1 && self.last_op() == Some(Op::Not) {
            self.values[0] = !self.values[0];
            self.pop_op();
            return false;
        }
        if self.nvalues != 2 || self.nops == 0 {
            return false;
        }
        if self.last_op() == Some(Op::Not) {
            self.values[1] = !self.values[1];
            self.pop_op();
        }
        let (left, right) = (self.values[0], self.values[1]);
        let op = self.pop_op();
        let combined = match op {
            Some(Op::And) => left && right,
            Some(Op::Or) => left || right,
            Some(Op::Not) | None => {
                panic!("negation without a binary operator between two values")
            }
        };
        self.values = [combined, false];
        self.nvalues = 1;
        self.ops = [None; 2];
        self.nops = 0;
        op == Some(Op::Or) && combined
    }

    fn result(&self) -> bool {
        match self.nvalues {
            0 => false,
            1 => self.values[0],
            _ => panic!("too many pending values: grammar builder accepted an invalid expression"),
        }
    }
}

/// Evaluate an expression against one value
pub fn evaluate(expr: &Expression, value: &dyn Subject) -> bool {
    if expr.is_empty() {
        return false;
    }
    evaluate_level(expr.items(), value)
}

fn evaluate_level(items: &[Item], value: &dyn Subject) -> bool {
    let mut pending = Pending::default();
    for item in items {
        match item {
            Item::Operand(op) => pending.push_value(op.eval(value)),
            Item::SubExpression(sub) => pending.push_value(evaluate_level(sub.items(), value)),
            Item::And => pending.push_op(Op::And),
            Item::Or => {
                if pending.holds_true() {
                    return true;
                }
                pending.push_op(Op::Or);
            }
            Item::Not => pending.push_op(Op::Not),
            // brackets never survive the grammar builder
            Item::LeftBracket | Item::RightBracket => {}
        }
        if pending.reduce() {
            return true;
        }
    }
    pending.result()
}

impl Expression {
    /// Evaluate against one value. The empty expression is always false.
    pub fn eval(&self, value: &dyn Subject) -> bool {
        evaluate(self, value)
    }
}
