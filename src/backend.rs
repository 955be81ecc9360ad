//! Consumers of a finished [`CompileJob`].
//!
//! A backend receives the job (for its diagnostics and configuration) and the tree to emit, and reports
//! whether emission succeeded.

#![deny(clippy::unwrap_used)]

use std::io::Write;

use quix_syntax::ast::{AstNode, Root};

use crate::job::CompileJob;

/// Something that turns a parsed unit into output.
pub trait Backend {
    fn name(&self) -> &'static str;

    /// Emit `root`. Returns `false` if the job already failed or emission itself failed.
    fn emit(&mut self, job: &CompileJob, root: &Root) -> bool;
}

/// Writes the pretty-printed AST JSON followed by a newline.
#[derive(Debug)]
pub struct JsonBackend<W: Write> {
    out: W,
}

impl<W: Write> JsonBackend<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Backend for JsonBackend<W> {
    fn name(&self) -> &'static str {
        "json"
    }

    fn emit(&mut self, job: &CompileJob, root: &Root) -> bool {
        if !job.success() {
            tracing::debug!(backend = self.name(), "job failed, nothing emitted");
            return false;
        }
        let text = match serde_json::to_string_pretty(&root.to_json()) {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(backend = self.name(), %err, "cannot serialise tree");
                return false;
            }
        };
        if let Err(err) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::error!(backend = self.name(), %err, "write failed");
            return false;
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::job::JobConfig;

    #[test]
    fn writes_json_for_successful_jobs() {
        let mut job = CompileJob::new(JobConfig::new());
        assert!(job.parse_source("let x: i32 = 5;", "main.q"));
        let root = job.ast().cloned().unwrap();

        let mut backend = JsonBackend::new(Vec::new());
        assert!(backend.emit(&job, &root));
        let text = String::from_utf8(backend.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, root.to_json());
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn refuses_failed_jobs() {
        let mut job = CompileJob::new(JobConfig::new());
        assert!(!job.parse_source("let : i32;", "main.q"));

        let mut backend = JsonBackend::new(Vec::new());
        assert!(!backend.emit(&job, &Root::default()));
        assert!(backend.into_inner().is_empty());
    }
}
