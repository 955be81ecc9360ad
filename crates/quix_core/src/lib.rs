//! Canonical language vocabulary for the quix compiler front end.
//!
//! This crate holds the read-only tables every later stage consults: reserved keywords, operators (with
//! precedence and fixity), punctuation, and the primitive type table.
//!
//! ## Notes
//!
//! - No IO, no global mutable state, no dependencies. Every table is a `const` slice, so compilation jobs on
//!   different threads can share them without synchronisation.
//! - The lexer and parser in `quix_syntax` enforce syntax; this crate only answers "what is this spelling".

pub mod lang;
