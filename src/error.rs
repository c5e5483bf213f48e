// SPDX-License-Identifier: MIT

//! Typed error handling for boolexpr
//!
//! `ExprError` covers everything that can go wrong while turning text or
//! items into an `Expression`. `BoolexprError` wraps it together with the
//! configuration and I/O failures of the filter loader and the CLI.

use std::error::Error as StdError;
use thiserror::Error;

/// Errors raised while building an expression
#[derive(Debug, Error)]
pub enum ExprError {
    // --- lexical ---
    /// A character that cannot start any token
    #[error("unexpected character: {0}")]
    UnexpectedCharacter(char),

    /// `&` or `|` followed by something other than its twin
    #[error("not a valid operator, should be {0}")]
    InvalidOperator(&'static str),

    /// Input ended in the middle of `&&` or `||`
    #[error("incomplete operator: {0}")]
    IncompleteOperator(char),

    /// An operand name not terminated by `=`
    #[error("expected =, got {0}")]
    ExpectedEquals(char),

    /// A quoted value that never closes
    #[error("missing close quote: {0}")]
    MissingCloseQuote(String),

    /// A trailing backslash
    #[error("missing escaped rune")]
    MissingEscapedRune,

    // --- registry ---
    /// An operand name with no registered factory
    #[error("unsupported operand: {0}")]
    UnsupportedOperand(String),

    /// An operand name with no value token after it
    #[error("missing operand value: {0}")]
    MissingOperandValue(String),

    /// A token that cannot be turned into an item
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    // --- grammar ---
    #[error("unbalanced brackets")]
    UnbalancedBrackets,

    /// A binary operator or `)` with nothing before it
    #[error("missing left operand for {0}")]
    MissingLeftOperand(String),

    /// A binary operator or `)` preceded by another operator
    #[error("missing operand preceding {0}")]
    MissingOperand(String),

    /// `!` following something other than a binary operator
    #[error("misplaced negation after {0}")]
    MisplacedNegation(String),

    /// `(` directly following an operand
    #[error("missing operator preceding (")]
    MissingOperator,

    /// The item sequence does not alternate operands and operators
    #[error("incomplete expression: {0}")]
    IncompleteExpression(String),

    // --- operand preparation ---
    /// An operand rejected its own configuration; displayed verbatim
    #[error("{0}")]
    Operand(Box<dyn StdError + Send + Sync>),
}

impl ExprError {
    /// Wrap an operand's preparation failure
    pub fn operand(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Operand(err.into())
    }

    /// True for errors raised by the tokenizer
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedCharacter(_)
                | Self::InvalidOperator(_)
                | Self::IncompleteOperator(_)
                | Self::ExpectedEquals(_)
                | Self::MissingCloseQuote(_)
                | Self::MissingEscapedRune
        )
    }
}

/// Top-level error type for boolexpr
#[derive(Debug, Error)]
pub enum BoolexprError {
    /// Expression construction errors
    #[error(transparent)]
    Expr(#[from] ExprError),

    /// A named filter in a filter file failed to compile
    #[error("filter '{name}': {source}")]
    Filter {
        name: String,
        #[source]
        source: ExprError,
    },

    /// No filter with the requested name
    #[error("filter '{0}' not found")]
    FilterNotFound(String),

    /// Configuration errors (missing env vars, invalid config)
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl BoolexprError {
    /// Create a filter compilation error
    pub fn filter(name: impl Into<String>, source: ExprError) -> Self {
        Self::Filter {
            name: name.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
