//! The token-producing capability shared by the raw lexer and the preprocessor.
//!
//! The parser only ever talks to a `&mut dyn Scanner`, so macro expansion can be inserted or left out without
//! touching parser code.
//!
//! ## Examples
//! ```rust
//! use quix_syntax::lexer::{Lexer, TokenKind};
//! use quix_syntax::scanner::Scanner;
//!
//! let mut scanner = Lexer::from_source("let x", "demo.q");
//! assert_eq!(scanner.peek(), scanner.peek());
//! assert_eq!(scanner.next().kind, TokenKind::Keyword);
//! assert_eq!(scanner.next().kind, TokenKind::Identifier);
//! assert!(scanner.next().is_eof());
//! assert!(scanner.next().is_eof());
//! ```

use std::io::BufRead;

use crate::diagnostics::Diagnostic;
use crate::lexer::Token;
use crate::location::SourceMap;

/// Something that yields tokens one at a time.
pub trait Scanner {
    /// Consume and return the next token. Returns `EndOfFile` forever once the input is exhausted.
    fn next(&mut self) -> Token;

    /// Return the next token without consuming it. Repeated calls return the same token.
    fn peek(&mut self) -> Token;

    /// Bind a new source. Returns `false`, leaving the scanner unchanged, when the source cannot be read.
    fn set_source(&mut self, source: Box<dyn BufRead>, name: &str) -> bool;

    /// Drain diagnostics raised since the last call.
    fn take_diagnostics(&mut self) -> Vec<Diagnostic>;

    /// Names of the files this scanner has read, for rendering locations.
    fn source_map(&self) -> &SourceMap;
}
