#![forbid(unsafe_code)]
//! quixcc: the quix language front end.
//!
//! This crate ties the syntax front end in `quix_syntax` into compilation jobs, and adds the symbol mangler,
//! the tree-folding passes, output backends and the `quixcc` command line.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a logic error, use `.expect("INVARIANT: reason")` with a clear
//!   explanation.

pub mod backend;
pub mod cli;
pub mod job;
pub mod mangle;
pub mod passes;

pub use quix_syntax::{ast, diagnostics, lexer, parser, prep, scanner, visit};

pub use backend::{Backend, JsonBackend};
pub use job::{CompileJob, JobConfig};
pub use mangle::{demangle, demangle_prefix, mangle};
