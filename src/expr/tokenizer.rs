// SPDX-License-Identifier: MIT

//! Tokenizer for textual expressions
//!
//! Splits input such as `re=foo && !(type=d || re='a b')` into operator,
//! operand-name and operand-value tokens. Values are either bare (where a
//! backslash escapes any single character) or single-quoted (verbatim up
//! to the closing quote).

use crate::error::ExprError;

/// What a token represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// One of `&&`, `||`, `!`, `(`, `)`
    Operator,
    /// The text before `=`
    OperandName,
    /// The text after `=`, with quotes and escapes removed
    OperandValue,
}

/// A single token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    PendingAnd,
    PendingOr,
    OperandName,
    OperandValue,
    /// An unquoted value that has started accumulating
    EscapedValue,
    QuotedValue,
    /// The character after a backslash
    EscapedRune,
}

#[derive(Default)]
struct Tokenizer {
    tokens: Vec<Token>,
    buf: String,
}

impl Tokenizer {
    fn emit(&mut self, kind: TokenKind) {
        let text = std::mem::take(&mut self.buf);
        log::trace!("token {:?}: {:?}", kind, text);
        self.tokens.push(Token::new(text, kind));
    }

    fn emit_operator(&mut self, op: &str) {
        log::trace!("token Operator: {:?}", op);
        self.tokens.push(Token::new(op, TokenKind::Operator));
    }

    fn step(&mut self, state: State, c: char) -> Result<State, ExprError> {
        match state {
            State::Start => self.start(c),
            State::PendingAnd => self.pending(c, '&', "&&"),
            State::PendingOr => self.pending(c, '|', "||"),
            State::OperandName => self.operand_name(c),
            State::OperandValue if c == '\'' => Ok(State::QuotedValue),
            State::OperandValue | State::EscapedValue => Ok(self.unquoted_value(c)),
            State::QuotedValue => Ok(self.quoted_value(c)),
            State::EscapedRune => {
                self.buf.push(c);
                Ok(State::EscapedValue)
            }
        }
    }

    fn start(&mut self, c: char) -> Result<State, ExprError> {
        match c {
            c if c.is_whitespace() => Ok(State::Start),
            '(' => {
                self.emit_operator("(");
                Ok(State::Start)
            }
            ')' => {
                self.emit_operator(")");
                Ok(State::Start)
            }
            '!' => {
                self.emit_operator("!");
                Ok(State::Start)
            }
            '&' => Ok(State::PendingAnd),
            '|' => Ok(State::PendingOr),
            c if c.is_alphabetic() => {
                self.buf.push(c);
                Ok(State::OperandName)
            }
            c => Err(ExprError::UnexpectedCharacter(c)),
        }
    }

    fn pending(&mut self, c: char, twin: char, op: &'static str) -> Result<State, ExprError> {
        if c != twin {
            return Err(ExprError::InvalidOperator(op));
        }
        self.emit_operator(op);
        Ok(State::Start)
    }

    fn operand_name(&mut self, c: char) -> Result<State, ExprError> {
        match c {
            '=' => {
                self.emit(TokenKind::OperandName);
                Ok(State::OperandValue)
            }
            c if c.is_alphanumeric() || c == '-' || c == '_' => {
                self.buf.push(c);
                Ok(State::OperandName)
            }
            c => Err(ExprError::ExpectedEquals(c)),
        }
    }

    fn unquoted_value(&mut self, c: char) -> State {
        match c {
            '\\' => State::EscapedRune,
            c if c.is_whitespace() => {
                self.emit(TokenKind::OperandValue);
                State::Start
            }
            '(' | ')' => {
                self.emit(TokenKind::OperandValue);
                self.emit_operator(if c == '(' { "(" } else { ")" });
                State::Start
            }
            '&' => {
                self.emit(TokenKind::OperandValue);
                State::PendingAnd
            }
            '|' => {
                self.emit(TokenKind::OperandValue);
                State::PendingOr
            }
            c => {
                self.buf.push(c);
                State::EscapedValue
            }
        }
    }

    fn quoted_value(&mut self, c: char) -> State {
        if c == '\'' {
            self.emit(TokenKind::OperandValue);
            return State::Start;
        }
        self.buf.push(c);
        State::QuotedValue
    }

    fn finish(mut self, state: State) -> Result<Vec<Token>, ExprError> {
        match state {
            State::Start => {}
            State::OperandName => self.emit(TokenKind::OperandName),
            State::OperandValue | State::EscapedValue => self.emit(TokenKind::OperandValue),
            State::PendingAnd => return Err(ExprError::IncompleteOperator('&')),
            State::PendingOr => return Err(ExprError::IncompleteOperator('|')),
            State::QuotedValue => return Err(ExprError::MissingCloseQuote(self.buf)),
            State::EscapedRune => return Err(ExprError::MissingEscapedRune),
        }
        Ok(self.tokens)
    }
}

/// Tokenize an expression string
pub fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokenizer = Tokenizer::default();
    let mut state = State::Start;
    for c in input.chars() {
        state = tokenizer.step(state, c)?;
    }
    tokenizer.finish(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(s: &str) -> Token {
        Token::new(s, TokenKind::Operator)
    }

    fn name(s: &str) -> Token {
        Token::new(s, TokenKind::OperandName)
    }

    fn value(s: &str) -> Token {
        Token::new(s, TokenKind::OperandValue)
    }

    #[test]
    fn test_tokenize_simple_operand() {
        assert_eq!(tokenize("re=foo").unwrap(), vec![name("re"), value("foo")]);
    }

    #[test]
    fn test_tokenize_empty_and_blank() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \t ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_operators() {
        let tokens = tokenize("!re=a && (re=b || re=c)").unwrap();
        assert_eq!(
            tokens,
            vec![
                op("!"),
                name("re"),
                value("a"),
                op("&&"),
                op("("),
                name("re"),
                value("b"),
                op("||"),
                name("re"),
                value("c"),
                op(")"),
            ]
        );
    }

    #[test]
    fn test_tokenize_operators_terminate_values() {
        let tokens = tokenize("re=a&&re=b||(re=c)").unwrap();
        assert_eq!(
            tokens,
            vec![
                name("re"),
                value("a"),
                op("&&"),
                name("re"),
                value("b"),
                op("||"),
                op("("),
                name("re"),
                value("c"),
                op(")"),
            ]
        );
    }

    #[test]
    fn test_tokenize_quoted_value() {
        let tokens = tokenize("re='a b && (c)' || re=d").unwrap();
        assert_eq!(
            tokens,
            vec![
                name("re"),
                value("a b && (c)"),
                op("||"),
                name("re"),
                value("d"),
            ]
        );
    }

    #[test]
    fn test_tokenize_quotes_are_verbatim() {
        let tokens = tokenize(r"re='a\b'").unwrap();
        assert_eq!(tokens, vec![name("re"), value(r"a\b")]);
    }

    #[test]
    fn test_tokenize_escaped_value() {
        let tokens = tokenize(r"re=a\ b\&\|\(\)\\c").unwrap();
        assert_eq!(tokens, vec![name("re"), value(r"a b&|()\c")]);
    }

    #[test]
    fn test_tokenize_leading_escape() {
        let tokens = tokenize(r"re=\'x").unwrap();
        assert_eq!(tokens, vec![name("re"), value("'x")]);
    }

    #[test]
    fn test_tokenize_quote_inside_bare_value() {
        let tokens = tokenize("re=it's").unwrap();
        assert_eq!(tokens, vec![name("re"), value("it's")]);
    }

    #[test]
    fn test_tokenize_empty_value() {
        assert_eq!(tokenize("re=").unwrap(), vec![name("re"), value("")]);
        assert_eq!(
            tokenize("re= || re=b").unwrap(),
            vec![name("re"), value(""), op("||"), name("re"), value("b")]
        );
    }

    #[test]
    fn test_tokenize_names_with_dashes_and_digits() {
        let tokens = tokenize("file-larger=10K && x_2=y").unwrap();
        assert_eq!(
            tokens,
            vec![
                name("file-larger"),
                value("10K"),
                op("&&"),
                name("x_2"),
                value("y"),
            ]
        );
    }

    #[test]
    fn test_tokenize_trailing_name() {
        assert_eq!(tokenize("re").unwrap(), vec![name("re")]);
    }

    #[test]
    fn test_tokenize_unexpected_character() {
        let err = tokenize("re=a && 9").unwrap_err();
        assert_eq!(err.to_string(), "unexpected character: 9");
        assert!(err.is_lexical());
    }

    #[test]
    fn test_tokenize_invalid_operator() {
        assert_eq!(
            tokenize("re=a &x").unwrap_err().to_string(),
            "not a valid operator, should be &&"
        );
        assert_eq!(
            tokenize("re=a | re=b").unwrap_err().to_string(),
            "not a valid operator, should be ||"
        );
    }

    #[test]
    fn test_tokenize_incomplete_operator() {
        assert_eq!(
            tokenize("re=a &").unwrap_err().to_string(),
            "incomplete operator: &"
        );
        assert_eq!(
            tokenize("re=a|").unwrap_err().to_string(),
            "incomplete operator: |"
        );
    }

    #[test]
    fn test_tokenize_expected_equals() {
        assert_eq!(
            tokenize("re:foo").unwrap_err().to_string(),
            "expected =, got :"
        );
    }

    #[test]
    fn test_tokenize_missing_close_quote() {
        assert_eq!(
            tokenize("re='abc").unwrap_err().to_string(),
            "missing close quote: abc"
        );
    }

    #[test]
    fn test_tokenize_missing_escaped_rune() {
        assert_eq!(
            tokenize(r"re=ab\").unwrap_err().to_string(),
            "missing escaped rune"
        );
    }
}
