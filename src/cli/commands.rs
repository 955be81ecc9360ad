//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use quix_syntax::diagnostics::{Diagnostics, Severity};
use quix_syntax::lexer::{Lexer, LexerConfig};
use quix_syntax::location::SourceMap;
use quix_syntax::prep::{Preprocessor, PreprocessorConfig};
use quix_syntax::scanner::Scanner;

use crate::backend::{Backend, JsonBackend};
use crate::job::{CompileJob, JobConfig};
use crate::mangle;

use super::{CliError, CliResult, ExitCode};

// ============================================================================
// Shared helpers
// ============================================================================

/// Build a job configuration from `-I` / `-D` flags.
pub fn job_config(include: Vec<PathBuf>, statics: Vec<(String, String)>) -> JobConfig {
    let config = include
        .into_iter()
        .fold(JobConfig::new(), |config, dir| config.with_include_dir(dir));
    statics
        .into_iter()
        .fold(config, |config, (key, value)| config.with_static(key, value))
}

fn bind_file(scanner: &mut dyn Scanner, path: &Path) -> CliResult<()> {
    let file = File::open(path)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))?;
    if scanner.set_source(Box::new(BufReader::new(file)), &path.display().to_string()) {
        Ok(())
    } else {
        Err(CliError::failure(format!("Error reading file '{}'", path.display())))
    }
}

/// Drain `scanner` to end of file, rendering each token as `line:col Token`.
pub fn dump_tokens(scanner: &mut dyn Scanner) -> (Vec<String>, Diagnostics) {
    let mut lines = Vec::new();
    let mut diagnostics = Diagnostics::new();
    loop {
        let token = scanner.next();
        diagnostics.absorb(scanner.take_diagnostics());
        if token.is_eof() {
            break;
        }
        lines.push(format!("{}:{} {}", token.loc.line, token.loc.column, token));
    }
    (lines, diagnostics)
}

/// Turn a diagnostics sink into the command's outcome.
///
/// Warnings and notes go to stderr; any error becomes the returned `CliError`.
fn conclude(diagnostics: &Diagnostics, files: &SourceMap) -> CliResult<ExitCode> {
    if diagnostics.has_errors() {
        return Err(CliError::failure(diagnostics.render(files, Severity::Info)));
    }
    let notes = diagnostics.render(files, Severity::Info);
    if !notes.is_empty() {
        eprintln!("{notes}");
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Commands
// ============================================================================

/// Dump raw tokens.
pub fn lex_file(path: &Path, keep_comments: bool) -> CliResult<ExitCode> {
    let mut lexer = Lexer::with_config(LexerConfig::new().with_keep_comments(keep_comments));
    bind_file(&mut lexer, path)?;
    let (lines, diagnostics) = dump_tokens(&mut lexer);
    for line in &lines {
        println!("{line}");
    }
    conclude(&diagnostics, lexer.source_map())
}

/// Dump tokens after preprocessing.
pub fn prep_file(path: &Path, include: Vec<PathBuf>, statics: Vec<(String, String)>) -> CliResult<ExitCode> {
    let config = statics.into_iter().fold(
        PreprocessorConfig::new().with_include_dirs(include),
        |config, (key, value)| config.with_static(key, value),
    );
    let mut prep = Preprocessor::new(config);
    bind_file(&mut prep, path)?;
    let (lines, diagnostics) = dump_tokens(&mut prep);
    for line in &lines {
        println!("{line}");
    }
    conclude(&diagnostics, prep.source_map())
}

/// Parse and print the AST as JSON.
pub fn parse_file(path: &Path, config: JobConfig) -> CliResult<ExitCode> {
    let mut job = CompileJob::new(config);
    job.parse_file(path);
    if let Some(root) = job.ast() {
        let mut backend = JsonBackend::new(io::stdout().lock());
        if job.success() && !backend.emit(&job, root) {
            return Err(CliError::failure("Error writing AST"));
        }
    }
    conclude(job.diagnostics(), job.source_map())
}

/// Print `symbol<TAB>name` for every top-level binding.
pub fn mangle_file(path: &Path) -> CliResult<ExitCode> {
    let mut job = CompileJob::new(JobConfig::new());
    job.parse_file(path);
    if job.success() {
        if let Some(root) = job.ast() {
            for symbol in mangle::symbols(root) {
                println!("{}\t{}", symbol.mangle(), symbol.name);
            }
        }
    }
    conclude(job.diagnostics(), job.source_map())
}

/// Print each decoded symbol as `kind name: Type`.
pub fn demangle_symbols(symbols: &[String]) -> CliResult<ExitCode> {
    let mut failures = Vec::new();
    for symbol in symbols {
        match mangle::demangle_symbol(symbol) {
            Ok(decoded) => println!("{decoded}"),
            // miette renders the error with its diagnostic code.
            Err(err) => failures.push(format!("{:?}", miette::Report::new(err))),
        }
    }
    if failures.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::failure(failures.join("\n")))
    }
}
