//! Diagnostics sink and the front end's error taxonomy.
//!
//! Every stage reports through a job-scoped [`Diagnostics`] value. Structured failures are `thiserror` enums
//! deriving [`miette::Diagnostic`]; [`Diagnostics::report`] turns one into a location-tagged entry and keeps
//! its stable code.
//!
//! ## Notes
//! - Each pushed entry is mirrored as a `tracing` event at the matching level, so a host that installs a
//!   subscriber sees diagnostics live without draining the sink.
//! - [`LexError`] is recoverable (the lexer keeps going); every other family fails the production that
//!   raised it.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::location::{Location, SourceMap};

// ============================================================================
// SEVERITY / ENTRIES
// ============================================================================

/// How serious a diagnostic is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// `Error` and `Fatal` fail the compilation job.
    pub fn is_failure(self) -> bool {
        self >= Severity::Error
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub loc: Location,
    pub message: String,
    /// Stable code of the error that produced this entry, if any (e.g. `quix::parse::missing_identifier`).
    pub code: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, loc: Location, message: impl Into<String>) -> Self {
        Self {
            severity,
            loc,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Render as `file:line:col: severity: message [code]`.
    pub fn render(&self, files: &SourceMap) -> String {
        let mut out = format!("{}: {}: {}", files.describe(self.loc), self.severity, self.message);
        if let Some(code) = &self.code {
            out.push_str(&format!(" [{code}]"));
        }
        out
    }
}

// ============================================================================
// SINK
// ============================================================================

/// Job-scoped accumulator of diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry and mirror it to `tracing`.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        emit_trace(&diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn emit(&mut self, severity: Severity, loc: Location, message: impl Into<String>) {
        self.push(Diagnostic::new(severity, loc, message));
    }

    /// Record a structured error at `loc`, with the severity its family carries.
    pub fn report<E: Reportable>(&mut self, err: &E, loc: Location) {
        let mut diagnostic = Diagnostic::new(err.level(), loc, err.to_string());
        if let Some(code) = err.code() {
            diagnostic = diagnostic.with_code(code.to_string());
        }
        self.push(diagnostic);
    }

    /// Move every entry out of `other` into this sink without re-emitting trace events.
    pub fn absorb(&mut self, other: Vec<Diagnostic>) {
        self.entries.extend(other);
    }

    /// Drain all entries, leaving the sink empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }

    /// `true` once any `Error` or `Fatal` entry has been recorded.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity.is_failure())
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|d| d.severity.is_failure()).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render every entry at or above `min`, one per line.
    pub fn render(&self, files: &SourceMap, min: Severity) -> String {
        self.entries
            .iter()
            .filter(|d| d.severity >= min)
            .map(|d| d.render(files))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn emit_trace(d: &Diagnostic) {
    let code = d.code.as_deref().unwrap_or("");
    match d.severity {
        Severity::Debug => tracing::debug!(line = d.loc.line, column = d.loc.column, code, "{}", d.message),
        Severity::Info => tracing::info!(line = d.loc.line, column = d.loc.column, code, "{}", d.message),
        Severity::Warn => tracing::warn!(line = d.loc.line, column = d.loc.column, code, "{}", d.message),
        Severity::Error | Severity::Fatal => {
            tracing::error!(line = d.loc.line, column = d.loc.column, code, "{}", d.message)
        }
    }
}

/// An error family that knows how severe it is.
pub trait Reportable: MietteDiagnostic {
    fn level(&self) -> Severity {
        Severity::Error
    }
}

// ============================================================================
// ERROR TAXONOMY
// ============================================================================

/// Token-level lexing problems. The lexer yields an `Unknown` token and continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum LexError {
    #[error("unexpected character {0:?}")]
    #[diagnostic(code(quix::lex::unexpected_character))]
    UnexpectedCharacter(char),

    #[error("unterminated string literal")]
    #[diagnostic(code(quix::lex::unterminated_string))]
    UnterminatedString,

    #[error("unterminated character literal")]
    #[diagnostic(code(quix::lex::unterminated_char))]
    UnterminatedChar,

    #[error("character literal must contain exactly one character")]
    #[diagnostic(code(quix::lex::bad_char_literal))]
    BadCharLiteral,

    #[error("unknown escape sequence '\\{0}'")]
    #[diagnostic(code(quix::lex::unknown_escape))]
    UnknownEscape(char),

    #[error("unterminated block comment")]
    #[diagnostic(code(quix::lex::unterminated_comment))]
    UnterminatedComment,

    #[error("unterminated macro block")]
    #[diagnostic(code(quix::lex::unterminated_macro))]
    UnterminatedMacro,

    #[error("malformed numeric literal '{0}'")]
    #[diagnostic(code(quix::lex::bad_number))]
    BadNumber(String),

    #[error("integer literal '{0}' does not fit in 64 bits")]
    #[diagnostic(code(quix::lex::integer_overflow))]
    IntegerOverflow(String),

    #[error("source is not valid UTF-8")]
    #[diagnostic(code(quix::lex::invalid_utf8))]
    InvalidUtf8,

    #[error("failed to read source: {0}")]
    #[diagnostic(code(quix::lex::read_failed))]
    Read(String),
}

impl Reportable for LexError {}

/// Unknown or failing macro directives. Fatal to the job.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum DirectiveError {
    #[error("unknown macro directive '{0}'")]
    #[diagnostic(code(quix::prep::unknown_directive), help("built-in directives are define, pragma, print and static"))]
    Unknown(String),

    #[error("empty macro directive")]
    #[diagnostic(code(quix::prep::empty_directive))]
    Empty,

    #[error("'{directive}' expects {expected}")]
    #[diagnostic(code(quix::prep::bad_arguments))]
    BadArguments {
        directive: &'static str,
        expected: &'static str,
    },

    #[error("'{0}' is not a valid identifier")]
    #[diagnostic(code(quix::prep::bad_name))]
    BadName(String),

    #[error("no static named '{0}'")]
    #[diagnostic(code(quix::prep::unknown_static))]
    UnknownStatic(String),

    #[error("{0}")]
    #[diagnostic(code(quix::prep::user_error))]
    UserError(String),
}

impl Reportable for DirectiveError {
    fn level(&self) -> Severity {
        match self {
            DirectiveError::UserError(_) => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

/// Import resolution failures. Fatal to the job.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum IncludeError {
    #[error("cannot find import '{target}'")]
    #[diagnostic(code(quix::prep::import_not_found))]
    NotFound { target: String, searched: Vec<PathBuf> },

    #[error("circular import of '{}' (chain: {})", .path.display(), render_chain(.chain))]
    #[diagnostic(code(quix::prep::circular_import))]
    Circular { path: PathBuf, chain: Vec<PathBuf> },

    #[error("imports nested deeper than {limit} files")]
    #[diagnostic(code(quix::prep::import_too_deep))]
    TooDeep { limit: usize },

    #[error("expected a module path or string after 'import'")]
    #[diagnostic(code(quix::prep::bad_import))]
    BadTarget,

    #[error("expected ';' after import")]
    #[diagnostic(code(quix::prep::missing_semicolon))]
    MissingSemicolon,

    #[error("failed to open '{}': {message}", .path.display())]
    #[diagnostic(code(quix::prep::open_failed))]
    Open { path: PathBuf, message: String },
}

impl Reportable for IncludeError {
    fn level(&self) -> Severity {
        Severity::Fatal
    }
}

fn render_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Which part of a `var`/`let`/`const` declaration was malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclPart {
    Identifier,
    Colon,
    Type,
    Initializer,
    Terminator,
}

/// Expected-token mismatches. Fatal to the current top-level parse.
#[derive(Debug, Clone, PartialEq, Error, MietteDiagnostic)]
pub enum SyntaxError {
    #[error("expected an identifier after '{keyword}'")]
    #[diagnostic(code(quix::parse::missing_identifier))]
    MissingIdentifier { keyword: &'static str },

    #[error("expected ':' after '{name}'")]
    #[diagnostic(code(quix::parse::missing_colon))]
    MissingColon { name: String },

    #[error("invalid type for '{name}': {reason}")]
    #[diagnostic(code(quix::parse::bad_type))]
    BadType { name: String, reason: String },

    #[error("invalid initializer for '{name}': {reason}")]
    #[diagnostic(code(quix::parse::bad_initializer))]
    BadInitializer { name: String, reason: String },

    #[error("expected '{expected}' to end the declaration of '{name}', found {found}")]
    #[diagnostic(code(quix::parse::missing_terminator))]
    MissingTerminator {
        name: String,
        expected: &'static str,
        found: String,
    },

    #[error("expected a declaration keyword, found {found}")]
    #[diagnostic(code(quix::parse::expected_declaration))]
    ExpectedDeclaration { found: String },

    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(quix::parse::unexpected_token))]
    Unexpected { expected: String, found: String },

    #[error("unknown type '{0}'")]
    #[diagnostic(code(quix::parse::unknown_type), help("only primitive types and previously declared types are allowed"))]
    UnknownType(String),

    #[error("invalid constant expression: {0}")]
    #[diagnostic(code(quix::parse::bad_const_expr))]
    BadConstExpr(String),

    #[error("nesting deeper than {0} levels")]
    #[diagnostic(code(quix::parse::too_deep))]
    TooDeep(usize),

    #[error("parse aborted after earlier errors")]
    #[diagnostic(code(quix::parse::aborted))]
    Aborted,
}

impl SyntaxError {
    /// The declaration part this error refers to, for the five `var`/`let`/`const` failure modes.
    pub fn decl_part(&self) -> Option<DeclPart> {
        match self {
            SyntaxError::MissingIdentifier { .. } => Some(DeclPart::Identifier),
            SyntaxError::MissingColon { .. } => Some(DeclPart::Colon),
            SyntaxError::BadType { .. } => Some(DeclPart::Type),
            SyntaxError::BadInitializer { .. } => Some(DeclPart::Initializer),
            SyntaxError::MissingTerminator { .. } => Some(DeclPart::Terminator),
            _ => None,
        }
    }
}

impl Reportable for SyntaxError {
    fn level(&self) -> Severity {
        match self {
            SyntaxError::ExpectedDeclaration { .. } => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

/// Declarations outside the mangled subset, or malformed symbols.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ManglingError {
    #[error("cannot mangle a {0} declaration")]
    #[diagnostic(code(quix::mangle::unsupported))]
    Unsupported(&'static str),

    #[error("'{symbol}' is not a quix symbol: {reason} at offset {offset}")]
    #[diagnostic(code(quix::mangle::malformed))]
    Malformed {
        symbol: String,
        offset: usize,
        reason: &'static str,
    },
}

impl Reportable for ManglingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::FileId;

    #[test]
    fn has_errors_only_for_error_and_fatal() {
        let mut sink = Diagnostics::new();
        sink.emit(Severity::Info, Location::UNKNOWN, "hello");
        sink.emit(Severity::Warn, Location::UNKNOWN, "careful");
        assert!(!sink.has_errors());
        sink.emit(Severity::Fatal, Location::UNKNOWN, "boom");
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn report_carries_miette_code() {
        let mut sink = Diagnostics::new();
        let err = SyntaxError::MissingIdentifier { keyword: "let" };
        sink.report(&err, Location::new(1, 5, FileId(0)));

        let entry = sink.iter().next().expect("one entry");
        assert_eq!(entry.severity, Severity::Error);
        assert_eq!(entry.code.as_deref(), Some("quix::parse::missing_identifier"));
        assert_eq!(entry.message, "expected an identifier after 'let'");
    }

    #[test]
    fn report_uses_family_level() {
        let mut sink = Diagnostics::new();
        sink.report(&DirectiveError::Empty, Location::UNKNOWN);
        sink.report(&DirectiveError::UserError("stop".into()), Location::UNKNOWN);
        sink.report(&SyntaxError::ExpectedDeclaration { found: "1".into() }, Location::UNKNOWN);
        sink.report(&ManglingError::Unsupported("function"), Location::UNKNOWN);

        let levels: Vec<_> = sink.iter().map(|d| d.severity).collect();
        assert_eq!(levels, [Severity::Fatal, Severity::Error, Severity::Fatal, Severity::Error]);
    }

    #[test]
    fn render_includes_file_and_code() {
        let mut files = SourceMap::new();
        let id = files.add("a.q");
        let d = Diagnostic::new(Severity::Warn, Location::new(2, 3, id), "odd").with_code("x::y");
        assert_eq!(d.render(&files), "a.q:2:3: warning: odd [x::y]");
    }

    #[test]
    fn circular_message_lists_chain() {
        let err = IncludeError::Circular {
            path: PathBuf::from("a.qh"),
            chain: vec![PathBuf::from("a.qh"), PathBuf::from("b.qh")],
        };
        assert_eq!(err.to_string(), "circular import of 'a.qh' (chain: a.qh -> b.qh)");
    }

    #[test]
    fn decl_parts_are_distinct() {
        let parts = [
            SyntaxError::MissingIdentifier { keyword: "let" }.decl_part(),
            SyntaxError::MissingColon { name: "x".into() }.decl_part(),
            SyntaxError::BadType {
                name: "x".into(),
                reason: String::new(),
            }
            .decl_part(),
            SyntaxError::BadInitializer {
                name: "x".into(),
                reason: String::new(),
            }
            .decl_part(),
            SyntaxError::MissingTerminator {
                name: "x".into(),
                expected: ";",
                found: String::new(),
            }
            .decl_part(),
        ];
        let unique: std::collections::HashSet<_> = parts.iter().flatten().collect();
        assert_eq!(unique.len(), 5);
    }
}
