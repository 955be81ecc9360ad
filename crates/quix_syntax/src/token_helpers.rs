//! Small helper APIs for working with [`Token`] / [`TokenValue`].
//!
//! These exist to reduce repetitive `matches!(...)` at call sites and to make ID-based tokens easy to test.

use crate::lexer::{Token, TokenKind, TokenValue};
use quix_core::lang::keywords::KeywordId;
use quix_core::lang::operators::OperatorId;
use quix_core::lang::punctuation::PunctuationId;

impl TokenValue {
    /// Return the keyword id, if this is a keyword value.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenValue::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return the operator id, if this is an operator value.
    pub fn operator_id(&self) -> Option<OperatorId> {
        match self {
            TokenValue::Operator(id) => Some(*id),
            _ => None,
        }
    }

    /// Return the punctuation id, if this is a punctuation value.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenValue::Punctuator(id) => Some(*id),
            _ => None,
        }
    }

    /// Return the carried text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Token {
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.value.keyword_id()
    }

    pub fn operator_id(&self) -> Option<OperatorId> {
        self.value.operator_id()
    }

    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.value.punctuation_id()
    }

    pub fn text(&self) -> Option<&str> {
        self.value.text()
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.keyword_id() == Some(id)
    }

    /// Return `true` if this is the given operator.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        self.operator_id() == Some(id)
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        self.punctuation_id() == Some(id)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }

    /// Return `true` for macro directive tokens (`@name ...` and `@( ... )`).
    pub fn is_macro(&self) -> bool {
        matches!(self.kind, TokenKind::MacroSingleLine | TokenKind::MacroBlock)
    }

    /// Return the identifier name, if this is an identifier token.
    pub fn ident_name(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Identifier => self.text(),
            _ => None,
        }
    }
}
