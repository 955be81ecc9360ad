//! Shared metadata for the `quix_core::lang` registries.
//!
//! ## Notes
//! - These types are `Copy` so registries can live in `const` tables.
//! - Metadata is for tooling and diagnostics; the lexer/parser own the syntax rules.

/// Language version a vocabulary item is available since, as `(major, minor)`.
///
/// ## Examples
/// ```rust
/// use quix_core::lang::registry::Since;
///
/// assert_eq!(Since(0, 1).to_string(), "0.1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Since(pub u16, pub u16);

impl std::fmt::Display for Since {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// Lifecycle status of a vocabulary item.
///
/// `Reserved` items are recognised by the lexer (so they cannot be used as identifiers) but no grammar
/// production accepts them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Reserved,
}
