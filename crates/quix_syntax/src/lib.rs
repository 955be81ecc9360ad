//! Syntax front end for the quix language: lexer, preprocessor, parser, AST, diagnostics.
//!
//! Every stage is reusable on its own. The lexer and the preprocessor both implement
//! [`scanner::Scanner`], so the parser works on raw or preprocessed token streams alike.
//!
//! ## Notes
//! - This crate is "syntax-only": it does not resolve names or check types beyond inferring literal widths
//!   and evaluating const-expressions.
//! - Vocabulary identity (keywords/operators/punctuation/primitive types) comes from `quix_core::lang`.
//! - Nothing here is global: each compilation job owns its scanner, parser and [`diagnostics::Diagnostics`].
//!
//! ## Examples
//! ```rust
//! use quix_syntax::diagnostics::Diagnostics;
//! use quix_syntax::prep::{Preprocessor, PreprocessorConfig};
//! use quix_syntax::parser;
//!
//! let mut prep = Preprocessor::from_source("@define DEBUG\nlet x: i32 = 5;", "main.q", PreprocessorConfig::new());
//! let mut diagnostics = Diagnostics::new();
//! let root = parser::parse(&mut prep, &mut diagnostics).unwrap();
//! assert_eq!(root.body.stmts.len(), 2);
//! ```

#![forbid(unsafe_code)]

pub mod ast;
pub mod const_eval;
pub mod diagnostics;
pub mod lexer;
pub mod location;
pub mod parser;
pub mod prep;
pub mod scanner;
pub mod token_helpers;
pub mod visit;
