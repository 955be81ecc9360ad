//! Tree rewrites that run after parsing.
//!
//! Passes mutate the [`Root`](quix_syntax::ast::Root) in place through [`quix_syntax::visit`] and report
//! how many nodes they replaced.

mod fold;

pub use fold::{fold_constants, fold_string_concat};
