// SPDX-License-Identifier: MIT

use super::ast::{Expression, Item};
use super::operand::Operand;
use super::parser::build;
use super::tokenizer::{tokenize, Token, TokenKind};
use crate::error::ExprError;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Builds an operand from its name and raw, unprepared value
pub type OperandFactory = Arc<dyn Fn(&str, &str) -> Arc<dyn Operand> + Send + Sync>;

/// Maps operand names to factories and parses text into expressions.
///
/// Clones share the same table. Configure it before parsing from several
/// threads; lookups only take a read lock.
#[derive(Clone)]
pub struct OperandRegistry {
    factories: Arc<RwLock<HashMap<String, OperandFactory>>>,
}

impl OperandRegistry {
    pub fn new() -> Self {
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a factory, replacing any previous one with the same name
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(&str, &str) -> Arc<dyn Operand> + Send + Sync + 'static,
    {
        let name = name.into();
        log::debug!("registering operand: {}", name);
        let mut factories = self
            .factories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        factories.insert(name, Arc::new(factory));
    }

    /// Remove a factory. Returns whether it was registered.
    pub fn remove(&self, name: &str) -> bool {
        let mut factories = self
            .factories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let removed = factories.remove(name).is_some();
        if removed {
            log::debug!("removed operand: {}", name);
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factory(name).is_some()
    }

    fn factory(&self, name: &str) -> Option<OperandFactory> {
        let factories = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        factories.get(name).cloned()
    }

    /// Every registered operand, instantiated with an empty value and
    /// sorted by name
    pub fn list(&self) -> Vec<Arc<dyn Operand>> {
        let mut entries: Vec<(String, OperandFactory)> = {
            let factories = self
                .factories
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            factories
                .iter()
                .map(|(name, factory)| (name.clone(), Arc::clone(factory)))
                .collect()
        };
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
            .into_iter()
            .map(|(name, factory)| factory(&name, ""))
            .collect()
    }

    /// Tokenize text and merge operand names and values into items
    pub fn items(&self, text: &str) -> Result<Vec<Item>, ExprError> {
        let mut tokens = tokenize(text)?.into_iter().peekable();
        let mut items = Vec::new();

        while let Some(token) = tokens.next() {
            match token.kind {
                TokenKind::Operator => items.push(operator_item(token)?),
                TokenKind::OperandName => {
                    let value = tokens
                        .next_if(|t| t.kind == TokenKind::OperandValue)
                        .ok_or_else(|| ExprError::MissingOperandValue(token.text.clone()))?;
                    let factory = self
                        .factory(&token.text)
                        .ok_or_else(|| ExprError::UnsupportedOperand(token.text.clone()))?;
                    items.push(Item::Operand(factory(&token.text, &value.text)));
                }
                TokenKind::OperandValue => return Err(ExprError::UnexpectedToken(token.text)),
            }
        }
        Ok(items)
    }

    /// Parse text into an expression using the registered operands
    pub fn parse(&self, text: &str) -> Result<Expression, ExprError> {
        build(self.items(text)?)
    }
}

fn operator_item(token: Token) -> Result<Item, ExprError> {
    match token.text.as_str() {
        "&&" => Ok(Item::And),
        "||" => Ok(Item::Or),
        "!" => Ok(Item::Not),
        "(" => Ok(Item::LeftBracket),
        ")" => Ok(Item::RightBracket),
        _ => Err(ExprError::UnexpectedToken(token.text)),
    }
}

impl Default for OperandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OperandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factories = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<&String> = factories.keys().collect();
        names.sort();
        f.debug_struct("OperandRegistry")
            .field("operands", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::operand::{fmt_operand, PrepareError, Subject};

    /// Matches values equal to its configured text
    #[derive(Debug)]
    struct MockOperand {
        name: String,
        value: String,
    }

    impl MockOperand {
        fn factory(name: &str, value: &str) -> Arc<dyn Operand> {
            Arc::new(Self {
                name: name.to_string(),
                value: value.to_string(),
            })
        }
    }

    impl fmt::Display for MockOperand {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            fmt_operand(f, &self.name, &self.value)
        }
    }

    impl Operand for MockOperand {
        fn name(&self) -> &str {
            &self.name
        }

        fn prepare(&self) -> Result<Arc<dyn Operand>, PrepareError> {
            Ok(Self::factory(&self.name, &self.value))
        }

        fn eval(&self, value: &dyn Subject) -> bool {
            value.name() == Some(self.value.as_str())
        }
    }

    #[test]
    fn test_register_and_parse() {
        let registry = OperandRegistry::new();
        registry.register("eq", MockOperand::factory);

        let expr = registry.parse("eq=foo").unwrap();
        assert!(expr.eval(&"foo"));
        assert!(!expr.eval(&"bar"));
    }

    #[test]
    fn test_unsupported_operand() {
        let registry = OperandRegistry::new();
        let err = registry.parse("nope=foo").unwrap_err();
        assert_eq!(err.to_string(), "unsupported operand: nope");
    }

    #[test]
    fn test_missing_operand_value() {
        let registry = OperandRegistry::new();
        registry.register("eq", MockOperand::factory);
        assert_eq!(
            registry.parse("eq").unwrap_err().to_string(),
            "missing operand value: eq"
        );
    }

    #[test]
    fn test_remove() {
        let registry = OperandRegistry::new();
        registry.register("eq", MockOperand::factory);
        assert!(registry.contains("eq"));
        assert!(registry.remove("eq"));
        assert!(!registry.remove("eq"));
        assert!(registry.parse("eq=foo").is_err());
    }

    #[test]
    fn test_list_is_sorted_with_empty_values() {
        let registry = OperandRegistry::new();
        registry.register("zeta", MockOperand::factory);
        registry.register("alpha", MockOperand::factory);
        registry.register("mid", MockOperand::factory);

        let listed: Vec<String> = registry.list().iter().map(|o| o.to_string()).collect();
        assert_eq!(listed, vec!["alpha=", "mid=", "zeta="]);
    }

    #[test]
    fn test_register_overwrites_existing() {
        let registry = OperandRegistry::new();
        registry.register("eq", MockOperand::factory);
        registry.register("eq", MockOperand::factory);
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn test_registry_is_clone() {
        let registry = OperandRegistry::new();
        let cloned = registry.clone();

        // Registering on clone should be visible to original
        cloned.register("eq", MockOperand::factory);
        assert!(registry.contains("eq"));
    }

    #[test]
    fn test_items_merges_names_and_values() {
        let registry = OperandRegistry::new();
        registry.register("eq", MockOperand::factory);

        let items = registry.items("!(eq='a b' || eq=c)").unwrap();
        let shown: Vec<String> = items.iter().map(|i| i.to_string()).collect();
        assert_eq!(shown, vec!["!", "(", "eq='a b'", "||", "eq=c", ")"]);
    }

    #[test]
    fn test_debug_lists_names() {
        let registry = OperandRegistry::new();
        registry.register("eq", MockOperand::factory);
        assert_eq!(
            format!("{:?}", registry),
            r#"OperandRegistry { operands: ["eq"] }"#
        );
    }
}
