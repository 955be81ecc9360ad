//! quix language vocabulary registries.
//!
//! Callers work with stable IDs (e.g. [`keywords::KeywordId`], [`operators::OperatorId`]) and look up
//! spellings/metadata via registry tables instead of comparing strings.
//!
//! ## Examples
//! ```rust
//! use quix_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("subsystem"), Some(KeywordId::Subsystem));
//! assert_eq!(keywords::as_str(KeywordId::Let), "let");
//! ```

pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod registry;
pub mod types;
