//! Recursive-descent parser for quix.
//!
//! Pulls tokens from any [`Scanner`] (the raw lexer or the preprocessor) and builds a [`Root`]. Array
//! lengths are evaluated while parsing, against the `const` declarations seen so far.
//!
//! ## Examples
//!
//! ```rust
//! use quix_syntax::diagnostics::Diagnostics;
//! use quix_syntax::lexer::Lexer;
//! use quix_syntax::parser;
//!
//! let mut lexer = Lexer::from_source("let x: i32 = 5;", "demo.q");
//! let mut diagnostics = Diagnostics::new();
//! let root = parser::parse(&mut lexer, &mut diagnostics).unwrap();
//! assert_eq!(root.body.stmts.len(), 1);
//! ```

use std::collections::{BTreeSet, HashSet};

use quix_core::lang::keywords::{self, KeywordId};
use quix_core::lang::operators::{self, Associativity, OperatorId};
use quix_core::lang::punctuation::{self, PunctuationId};
use quix_core::lang::types::{self as primitives, PrimitiveId};

use crate::ast::*;
use crate::const_eval::{self, ConstEnv, ConstValue};
use crate::diagnostics::{Diagnostics, SyntaxError};
use crate::lexer::{Lexer, Token, TokenKind, TokenValue, float_width};
use crate::location::Location;
use crate::scanner::Scanner;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module while avoiding a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/expr.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
