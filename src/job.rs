//! One compilation: configuration, diagnostics, the files read and the AST produced.
//!
//! A [`CompileJob`] owns every piece of mutable state a compilation touches, so independent jobs can run on
//! separate threads without sharing anything.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use quix_syntax::ast::Root;
use quix_syntax::diagnostics::{Diagnostics, IncludeError, Severity};
use quix_syntax::lexer::Lexer;
use quix_syntax::location::{Location, SourceMap};
use quix_syntax::parser;
use quix_syntax::prep::{Preprocessor, PreprocessorConfig};
use quix_syntax::scanner::Scanner;

use crate::passes;

/// Options for a [`CompileJob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    /// Run the preprocessor between lexer and parser.
    pub preprocess: bool,
    pub include_dirs: Vec<PathBuf>,
    /// Initial statics handed to the preprocessor.
    pub statics: BTreeMap<String, String>,
    /// Run the folding passes over the parsed tree.
    pub fold_constants: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            preprocess: true,
            include_dirs: Vec::new(),
            statics: BTreeMap::new(),
            fold_constants: false,
        }
    }
}

impl JobConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preprocess(mut self, preprocess: bool) -> Self {
        self.preprocess = preprocess;
        self
    }

    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    pub fn with_static(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.statics.insert(key.into(), value.into());
        self
    }

    pub fn with_fold_constants(mut self, fold: bool) -> Self {
        self.fold_constants = fold;
        self
    }

    fn preprocessor(&self) -> PreprocessorConfig {
        self.statics.iter().fold(
            PreprocessorConfig::new().with_include_dirs(self.include_dirs.iter().cloned()),
            |config, (key, value)| config.with_static(key.clone(), value.clone()),
        )
    }
}

/// A single compilation unit and everything it produced.
#[derive(Debug, Default)]
pub struct CompileJob {
    config: JobConfig,
    diagnostics: Diagnostics,
    files: SourceMap,
    ast: Option<Root>,
}

impl CompileJob {
    pub fn new(config: JobConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Compile an in-memory source registered under `name`. Returns [`CompileJob::success`].
    pub fn parse_source(&mut self, source: &str, name: &str) -> bool {
        self.run(Box::new(Cursor::new(source.as_bytes().to_vec())), name)
    }

    /// Compile the file at `path`. Returns [`CompileJob::success`].
    pub fn parse_file(&mut self, path: &Path) -> bool {
        match File::open(path) {
            Ok(file) => self.run(Box::new(BufReader::new(file)), &path.display().to_string()),
            Err(err) => {
                let err = IncludeError::Open {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                };
                self.diagnostics.report(&err, Location::UNKNOWN);
                false
            }
        }
    }

    #[tracing::instrument(skip_all, fields(name = %name))]
    fn run(&mut self, source: Box<dyn BufRead>, name: &str) -> bool {
        let mut scanner: Box<dyn Scanner> = if self.config.preprocess {
            Box::new(Preprocessor::new(self.config.preprocessor()))
        } else {
            Box::new(Lexer::new())
        };

        if !scanner.set_source(source, name) {
            self.diagnostics
                .emit(Severity::Error, Location::UNKNOWN, format!("cannot read '{name}'"));
            return false;
        }

        let parsed = parser::parse(scanner.as_mut(), &mut self.diagnostics);
        self.diagnostics.absorb(scanner.take_diagnostics());
        self.files = scanner.source_map().clone();

        // A parse error has already been reported into the sink.
        self.ast = parsed.ok();
        if self.config.fold_constants {
            if let Some(root) = self.ast.as_mut() {
                let concatenated = passes::fold_string_concat(root);
                let folded = passes::fold_constants(root);
                tracing::debug!(concatenated, folded, "folding passes done");
            }
        }
        self.success()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn ast(&self) -> Option<&Root> {
        self.ast.as_ref()
    }

    pub fn take_ast(&mut self) -> Option<Root> {
        self.ast.take()
    }

    /// `false` once any ERROR or FATAL diagnostic has been recorded.
    pub fn success(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.files
    }

    /// Diagnostics at or above `min`, one per line, with file names resolved.
    pub fn render_diagnostics(&self, min: Severity) -> String {
        self.diagnostics.render(&self.files, min)
    }
}
