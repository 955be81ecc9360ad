//! Punctuation vocabulary.
//!
//! Delimiters and separators that are not operators: `( ) { } [ ] . , : ;`.
//!
//! ## Notes
//! - Every punctuator is a single character; the lexer checks punctuation before operators.
//! - `::` is not a punctuator. It only appears inside namespaced identifiers (`std::io`).
//!
//! ## Examples
//! ```rust
//! use quix_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_char(';'), Some(PunctuationId::Semicolon));
//! assert_eq!(punctuation::as_str(PunctuationId::LBrace), "{");
//! ```

use super::registry::Since;

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets and braces.
    Delimiter,
    /// Separators like `,`, `:` and `;`.
    Separator,
    /// Member access `.`.
    Access,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Colon,
    Semicolon,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: char,
    pub category: PunctuationCategory,
    pub since: Since,
}

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::LParen, '(', PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ')', PunctuationCategory::Delimiter),
    info(PunctuationId::LBrace, '{', PunctuationCategory::Delimiter),
    info(PunctuationId::RBrace, '}', PunctuationCategory::Delimiter),
    info(PunctuationId::LBracket, '[', PunctuationCategory::Delimiter),
    info(PunctuationId::RBracket, ']', PunctuationCategory::Delimiter),
    info(PunctuationId::Dot, '.', PunctuationCategory::Access),
    info(PunctuationId::Comma, ',', PunctuationCategory::Separator),
    info(PunctuationId::Colon, ':', PunctuationCategory::Separator),
    info(PunctuationId::Semicolon, ';', PunctuationCategory::Separator),
];

/// Canonical spelling of a punctuation token.
pub fn as_str(id: PunctuationId) -> &'static str {
    match id {
        PunctuationId::LParen => "(",
        PunctuationId::RParen => ")",
        PunctuationId::LBrace => "{",
        PunctuationId::RBrace => "}",
        PunctuationId::LBracket => "[",
        PunctuationId::RBracket => "]",
        PunctuationId::Dot => ".",
        PunctuationId::Comma => ",",
        PunctuationId::Colon => ":",
        PunctuationId::Semicolon => ";",
    }
}

/// Return the category for a punctuation token.
pub fn category(id: PunctuationId) -> PunctuationCategory {
    info_for(id).category
}

/// Return the full metadata entry for a punctuation token.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("punctuation info missing")
}

/// Resolve a punctuation character to its identifier.
pub fn from_char(c: char) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == c).map(|p| p.id)
}

/// Resolve a punctuation spelling to its identifier.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => from_char(c),
        _ => None,
    }
}

const fn info(id: PunctuationId, canonical: char, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo {
        id,
        canonical,
        category,
        since: Since(0, 1),
    }
}
