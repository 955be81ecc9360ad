//! Token types for the quix lexer.
//!
//! A [`Token`] is `{kind, value, loc}`. Vocabulary tokens carry registry IDs from `quix_core::lang`; everything
//! else carries its text. Tokens are immutable values.
//!
//! ## Notes
//! - Equality compares `kind` and `value` only. Two occurrences of `x` at different places are equal tokens,
//!   which is what macro expansion tests and the preprocessor's comparisons rely on.
//! - [`Token`]'s `Display` is the debug form used by tooling and snapshots: `Identifier(foo)`, `Number(42)`,
//!   `Punctor(;)`.

use std::fmt;

use quix_core::lang::keywords::{self, KeywordId};
use quix_core::lang::operators::{self, OperatorId};
use quix_core::lang::punctuation::{self, PunctuationId};

use crate::location::Location;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EndOfFile,
    Unknown,
    Identifier,
    Keyword,
    Operator,
    Punctuator,
    StringLiteral,
    CharLiteral,
    IntegerLiteral,
    FloatLiteral,
    Comment,
    MacroBlock,
    MacroSingleLine,
}

/// Payload of a token.
///
/// Numeric literals keep their normalised source text (decimal for integers); widths are derived from it
/// with [`crate::lexer::int_width`] and [`crate::lexer::float_width`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenValue {
    None,
    Text(String),
    Char(char),
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuator(PunctuationId),
}

/// A token with its kind, value and source location.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub loc: Location,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

impl Eq for Token {}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, loc: Location) -> Self {
        Self { kind, value, loc }
    }

    pub fn eof(loc: Location) -> Self {
        Self::new(TokenKind::EndOfFile, TokenValue::None, loc)
    }

    pub fn unknown(text: impl Into<String>, loc: Location) -> Self {
        Self::new(TokenKind::Unknown, TokenValue::Text(text.into()), loc)
    }

    pub fn identifier(name: impl Into<String>, loc: Location) -> Self {
        Self::new(TokenKind::Identifier, TokenValue::Text(name.into()), loc)
    }

    pub fn keyword(id: KeywordId, loc: Location) -> Self {
        Self::new(TokenKind::Keyword, TokenValue::Keyword(id), loc)
    }

    pub fn operator(id: OperatorId, loc: Location) -> Self {
        Self::new(TokenKind::Operator, TokenValue::Operator(id), loc)
    }

    pub fn punctuator(id: PunctuationId, loc: Location) -> Self {
        Self::new(TokenKind::Punctuator, TokenValue::Punctuator(id), loc)
    }

    pub fn string(text: impl Into<String>, loc: Location) -> Self {
        Self::new(TokenKind::StringLiteral, TokenValue::Text(text.into()), loc)
    }

    pub fn char(c: char, loc: Location) -> Self {
        Self::new(TokenKind::CharLiteral, TokenValue::Char(c), loc)
    }

    pub fn integer(text: impl Into<String>, loc: Location) -> Self {
        Self::new(TokenKind::IntegerLiteral, TokenValue::Text(text.into()), loc)
    }

    pub fn float(text: impl Into<String>, loc: Location) -> Self {
        Self::new(TokenKind::FloatLiteral, TokenValue::Text(text.into()), loc)
    }

    /// The text the token would have in source, without quotes for string/char literals.
    pub fn spelling(&self) -> String {
        match &self.value {
            TokenValue::None => String::new(),
            TokenValue::Text(text) => text.clone(),
            TokenValue::Char(c) => c.to_string(),
            TokenValue::Keyword(id) => keywords::as_str(*id).to_string(),
            TokenValue::Operator(id) => operators::as_str(*id).to_string(),
            TokenValue::Punctuator(id) => punctuation::as_str(*id).to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spelling = self.spelling();
        match self.kind {
            TokenKind::EndOfFile => write!(f, "Eof"),
            TokenKind::Unknown => write!(f, "Unknown"),
            TokenKind::Identifier => write!(f, "Identifier({spelling})"),
            TokenKind::Keyword => write!(f, "Keyword({spelling})"),
            TokenKind::Operator => write!(f, "Operator({spelling})"),
            TokenKind::Punctuator => write!(f, "Punctor({spelling})"),
            TokenKind::StringLiteral => write!(f, "String({spelling:?})"),
            TokenKind::CharLiteral => match &self.value {
                TokenValue::Char(c) => write!(f, "Char({c:?})"),
                _ => write!(f, "Char({spelling})"),
            },
            TokenKind::IntegerLiteral => write!(f, "Number({spelling})"),
            TokenKind::FloatLiteral => write!(f, "Float({spelling})"),
            TokenKind::Comment => write!(f, "Comment({spelling})"),
            TokenKind::MacroBlock => write!(f, "MacroBlock({spelling})"),
            TokenKind::MacroSingleLine => write!(f, "MacroSingleLine({spelling})"),
        }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::FileId;

    #[test]
    fn equality_ignores_location() {
        let a = Token::identifier("x", Location::new(1, 1, FileId(0)));
        let b = Token::identifier("x", Location::new(9, 4, FileId(3)));
        assert_eq!(a, b);
        assert_ne!(a, Token::string("x", Location::UNKNOWN));
    }

    #[test]
    fn display_uses_debug_form() {
        let loc = Location::UNKNOWN;
        assert_eq!(Token::identifier("foo", loc).to_string(), "Identifier(foo)");
        assert_eq!(Token::integer("42", loc).to_string(), "Number(42)");
        assert_eq!(Token::punctuator(PunctuationId::Semicolon, loc).to_string(), "Punctor(;)");
        assert_eq!(Token::string("hi", loc).to_string(), "String(\"hi\")");
        assert_eq!(Token::char('a', loc).to_string(), "Char('a')");
        assert_eq!(Token::keyword(KeywordId::Let, loc).to_string(), "Keyword(let)");
        assert_eq!(Token::eof(loc).to_string(), "Eof");
    }
}
