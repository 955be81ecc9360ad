//! Operator vocabulary.
//!
//! This module defines the canonical operator set along with the metadata the const-expression parser needs:
//! infix precedence, associativity, whether the operator may be used in prefix position, and whether it is
//! evaluable without runtime context.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - The lexer matches operator spellings longest-first; [`MAX_SPELLING_LEN`] bounds the lookahead it needs.
//! - `@` is not an operator: it always introduces a macro directive.
//!
//! ## Examples
//! ```rust
//! use quix_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("<<="), Some(OperatorId::ShlEq));
//! assert!(operators::info_for(OperatorId::Star).precedence > operators::info_for(OperatorId::Plus).precedence);
//! ```

use super::registry::{Since, Stability};

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// Define where an operator may appear relative to its operand(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    /// Spelled the same in both positions (`-`, `+`).
    InfixOrPrefix,
    Postfix,
}

/// Broad grouping for documentation and const-evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Arithmetic,
    Bitwise,
    Logical,
    Comparison,
    Assignment,
    Increment,
    Conditional,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Bitwise
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,

    // Logical
    Bang,
    AndAnd,
    OrOr,
    XorXor,

    // Comparison
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    PipeEq,
    AmpEq,
    CaretEq,
    ShlEq,
    ShrEq,
    XorXorEq,
    OrOrEq,
    AndAndEq,

    // Increment / decrement
    PlusPlus,
    MinusMinus,

    // Conditional
    Question,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `precedence` is a relative ordering where higher binds tighter; it is only meaningful for infix use.
/// - `const_evaluable` marks operators allowed inside const-expressions.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
    pub category: OperatorCategory,
    pub const_evaluable: bool,
    pub since: Since,
    pub stability: Stability,
}

/// Precedence used for prefix operators; binds tighter than any infix operator.
pub const PREFIX_PRECEDENCE: u8 = 100;

/// Longest operator spelling, in bytes.
pub const MAX_SPELLING_LEN: usize = 3;

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    // Arithmetic
    op(OperatorId::Plus, "+", 80, Fixity::InfixOrPrefix, OperatorCategory::Arithmetic),
    op(OperatorId::Minus, "-", 80, Fixity::InfixOrPrefix, OperatorCategory::Arithmetic),
    op(OperatorId::Star, "*", 90, Fixity::Infix, OperatorCategory::Arithmetic),
    op(OperatorId::Slash, "/", 90, Fixity::Infix, OperatorCategory::Arithmetic),
    op(OperatorId::Percent, "%", 90, Fixity::Infix, OperatorCategory::Arithmetic),
    // Bitwise
    op(OperatorId::Amp, "&", 40, Fixity::Infix, OperatorCategory::Bitwise),
    op(OperatorId::Pipe, "|", 30, Fixity::Infix, OperatorCategory::Bitwise),
    op(OperatorId::Caret, "^", 35, Fixity::Infix, OperatorCategory::Bitwise),
    op(OperatorId::Tilde, "~", PREFIX_PRECEDENCE, Fixity::Prefix, OperatorCategory::Bitwise),
    op(OperatorId::Shl, "<<", 70, Fixity::Infix, OperatorCategory::Bitwise),
    op(OperatorId::Shr, ">>", 70, Fixity::Infix, OperatorCategory::Bitwise),
    // Logical
    op(OperatorId::Bang, "!", PREFIX_PRECEDENCE, Fixity::Prefix, OperatorCategory::Logical),
    op(OperatorId::AndAnd, "&&", 20, Fixity::Infix, OperatorCategory::Logical),
    op(OperatorId::OrOr, "||", 10, Fixity::Infix, OperatorCategory::Logical),
    op(OperatorId::XorXor, "^^", 15, Fixity::Infix, OperatorCategory::Logical),
    // Comparison
    op(OperatorId::Lt, "<", 60, Fixity::Infix, OperatorCategory::Comparison),
    op(OperatorId::Gt, ">", 60, Fixity::Infix, OperatorCategory::Comparison),
    op(OperatorId::LtEq, "<=", 60, Fixity::Infix, OperatorCategory::Comparison),
    op(OperatorId::GtEq, ">=", 60, Fixity::Infix, OperatorCategory::Comparison),
    op(OperatorId::EqEq, "==", 50, Fixity::Infix, OperatorCategory::Comparison),
    op(OperatorId::NotEq, "!=", 50, Fixity::Infix, OperatorCategory::Comparison),
    // Assignment
    assign(OperatorId::Eq, "="),
    assign(OperatorId::PlusEq, "+="),
    assign(OperatorId::MinusEq, "-="),
    assign(OperatorId::StarEq, "*="),
    assign(OperatorId::SlashEq, "/="),
    assign(OperatorId::PercentEq, "%="),
    assign(OperatorId::PipeEq, "|="),
    assign(OperatorId::AmpEq, "&="),
    assign(OperatorId::CaretEq, "^="),
    assign(OperatorId::ShlEq, "<<="),
    assign(OperatorId::ShrEq, ">>="),
    assign(OperatorId::XorXorEq, "^^="),
    assign(OperatorId::OrOrEq, "||="),
    assign(OperatorId::AndAndEq, "&&="),
    // Increment / decrement
    runtime(OperatorId::PlusPlus, "++", Fixity::Postfix, OperatorCategory::Increment),
    runtime(OperatorId::MinusMinus, "--", Fixity::Postfix, OperatorCategory::Increment),
    // Conditional
    runtime(OperatorId::Question, "?", Fixity::Infix, OperatorCategory::Conditional),
];

/// Canonical spelling of an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Resolve an operator spelling to its identifier.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Whether `id` may appear as an infix operator inside a const-expression.
pub fn is_const_binary(id: OperatorId) -> bool {
    let info = info_for(id);
    info.const_evaluable && matches!(info.fixity, Fixity::Infix | Fixity::InfixOrPrefix)
}

/// Whether `id` may appear as a prefix operator inside a const-expression.
pub fn is_const_prefix(id: OperatorId) -> bool {
    let info = info_for(id);
    info.const_evaluable && matches!(info.fixity, Fixity::Prefix | Fixity::InfixOrPrefix)
}

/// Whether some operator spelling starts with `c`.
pub fn is_operator_start(c: char) -> bool {
    OPERATORS.iter().any(|o| o.spelling.starts_with(c))
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spelling: &'static str,
    precedence: u8,
    fixity: Fixity,
    category: OperatorCategory,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        associativity: Associativity::Left,
        fixity,
        category,
        const_evaluable: true,
        since: Since(0, 1),
        stability: Stability::Stable,
    }
}

const fn assign(id: OperatorId, spelling: &'static str) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence: 1,
        associativity: Associativity::Right,
        fixity: Fixity::Infix,
        category: OperatorCategory::Assignment,
        const_evaluable: false,
        since: Since(0, 1),
        stability: Stability::Stable,
    }
}

const fn runtime(id: OperatorId, spelling: &'static str, fixity: Fixity, category: OperatorCategory) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence: 0,
        associativity: Associativity::Left,
        fixity,
        category,
        const_evaluable: false,
        since: Since(0, 1),
        stability: Stability::Reserved,
    }
}
