//! Reserved keyword vocabulary.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a
//! const metadata table ([`KEYWORDS`]) recording canonical spellings, categories and stability.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Words marked [`Stability::Reserved`] lex as keywords but have no grammar production yet; the parser
//!   reports them as unexpected.
//!
//! ## Examples
//! ```rust
//! use quix_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("fn"), Some(KeywordId::Fn));
//! assert_eq!(keywords::from_str("Fn"), None);
//! assert!(keywords::is_declaration(KeywordId::Struct));
//! ```

use super::registry::{Since, Stability};

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Modules / visibility
    Subsystem,
    Import,
    Pub,

    // Declarations
    Let,
    Var,
    Const,
    Struct,
    Union,
    Enum,
    Fn,

    // Statements
    Return,

    // Literals
    True,
    False,
    Null,
    Void,

    // Reserved for future grammar
    Region,
    Packet,
    Typedef,
    Static,
    Volatile,
    Class,
    Bundle,
    Public,
    Private,
    Protected,
    Override,
    Virtual,
    Abstract,
    Friend,
    Interface,
    Delete,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Retif,
    Abortif,
    Retz,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Module,
    Declaration,
    Statement,
    Literal,
    Modifier,
    ControlFlow,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub since: Since,
    pub stability: Stability,
}

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Modules / visibility
    info(KeywordId::Subsystem, "subsystem", KeywordCategory::Module),
    info(KeywordId::Import, "import", KeywordCategory::Module),
    info(KeywordId::Pub, "pub", KeywordCategory::Modifier),
    // Declarations
    info(KeywordId::Let, "let", KeywordCategory::Declaration),
    info(KeywordId::Var, "var", KeywordCategory::Declaration),
    info(KeywordId::Const, "const", KeywordCategory::Declaration),
    info(KeywordId::Struct, "struct", KeywordCategory::Declaration),
    info(KeywordId::Union, "union", KeywordCategory::Declaration),
    info(KeywordId::Enum, "enum", KeywordCategory::Declaration),
    info(KeywordId::Fn, "fn", KeywordCategory::Declaration),
    // Statements
    info(KeywordId::Return, "return", KeywordCategory::Statement),
    // Literals
    info(KeywordId::True, "true", KeywordCategory::Literal),
    info(KeywordId::False, "false", KeywordCategory::Literal),
    info(KeywordId::Null, "null", KeywordCategory::Literal),
    info(KeywordId::Void, "void", KeywordCategory::Literal),
    // Reserved
    reserved(KeywordId::Region, "region", KeywordCategory::Declaration),
    reserved(KeywordId::Packet, "packet", KeywordCategory::Declaration),
    reserved(KeywordId::Typedef, "typedef", KeywordCategory::Declaration),
    reserved(KeywordId::Static, "static", KeywordCategory::Modifier),
    reserved(KeywordId::Volatile, "volatile", KeywordCategory::Modifier),
    reserved(KeywordId::Class, "class", KeywordCategory::Declaration),
    reserved(KeywordId::Bundle, "bundle", KeywordCategory::Declaration),
    reserved(KeywordId::Public, "public", KeywordCategory::Modifier),
    reserved(KeywordId::Private, "private", KeywordCategory::Modifier),
    reserved(KeywordId::Protected, "protected", KeywordCategory::Modifier),
    reserved(KeywordId::Override, "override", KeywordCategory::Modifier),
    reserved(KeywordId::Virtual, "virtual", KeywordCategory::Modifier),
    reserved(KeywordId::Abstract, "abstract", KeywordCategory::Modifier),
    reserved(KeywordId::Friend, "friend", KeywordCategory::Modifier),
    reserved(KeywordId::Interface, "interface", KeywordCategory::Declaration),
    reserved(KeywordId::Delete, "delete", KeywordCategory::Statement),
    reserved(KeywordId::If, "if", KeywordCategory::ControlFlow),
    reserved(KeywordId::Else, "else", KeywordCategory::ControlFlow),
    reserved(KeywordId::For, "for", KeywordCategory::ControlFlow),
    reserved(KeywordId::While, "while", KeywordCategory::ControlFlow),
    reserved(KeywordId::Do, "do", KeywordCategory::ControlFlow),
    reserved(KeywordId::Switch, "switch", KeywordCategory::ControlFlow),
    reserved(KeywordId::Case, "case", KeywordCategory::ControlFlow),
    reserved(KeywordId::Default, "default", KeywordCategory::ControlFlow),
    reserved(KeywordId::Break, "break", KeywordCategory::ControlFlow),
    reserved(KeywordId::Continue, "continue", KeywordCategory::ControlFlow),
    reserved(KeywordId::Retif, "retif", KeywordCategory::ControlFlow),
    reserved(KeywordId::Abortif, "abortif", KeywordCategory::ControlFlow),
    reserved(KeywordId::Retz, "retz", KeywordCategory::ControlFlow),
];

/// Canonical spelling of a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Whether a keyword starts a declaration (`let`, `var`, `const`, `struct`, `union`, `enum`, `fn`).
pub fn is_declaration(id: KeywordId) -> bool {
    info_for(id).category == KeywordCategory::Declaration && info_for(id).stability == Stability::Stable
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling matches this registry, `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        since: Since(0, 1),
        stability: Stability::Stable,
    }
}

const fn reserved(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        since: Since(0, 1),
        stability: Stability::Reserved,
    }
}
