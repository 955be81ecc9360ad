//! Macro and import preprocessing.
//!
//! [`Preprocessor`] wraps a stack of [`Lexer`]s (one per open file) behind the same [`Scanner`] capability
//! the lexer has, so the parser cannot tell the two apart. On the way through it:
//!
//! - expands `@directive` markers through the [`directives::DIRECTIVES`] table,
//! - replaces `import target;` with the tokens of the imported file,
//! - rejects an import that is already open further up the chain.
//!
//! ## Module Structure
//!
//! - `directives` - Directive table and the built-in handlers
//! - `include` - Import target resolution and include stack entries
//!
//! ## Notes
//! - The first directive or import failure is reported once, after which the preprocessor only yields
//!   `EndOfFile`. Open import files are closed at that point.
//! - Statics can be set until the first token is pulled.

pub mod directives;
pub mod include;

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use quix_core::lang::keywords::KeywordId;
use quix_core::lang::punctuation::PunctuationId;

use crate::diagnostics::{Diagnostic, Diagnostics, DirectiveError, IncludeError, Reportable};
use crate::lexer::{Lexer, LexerConfig, Token, TokenKind};
use crate::location::{Location, SourceMap};
use crate::scanner::Scanner;

use directives::DirectiveContext;
use include::{HeaderSearch, IncludeEntry, canonical, module_path};

/// Default limit on nested imports.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 200;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Preprocessor options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessorConfig {
    /// Searched in order after the importing file's own directory.
    pub include_dirs: Vec<PathBuf>,
    pub max_include_depth: usize,
    /// Initial statics, readable through the `static` directive.
    pub statics: BTreeMap<String, String>,
    pub lexer: LexerConfig,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            include_dirs: Vec::new(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            statics: BTreeMap::new(),
            lexer: LexerConfig::default(),
        }
    }
}

impl PreprocessorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    pub fn with_include_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.include_dirs.extend(dirs);
        self
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    pub fn with_static(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.statics.insert(key.into(), value.into());
        self
    }

    pub fn with_lexer(mut self, lexer: LexerConfig) -> Self {
        self.lexer = lexer;
        self
    }
}

// ============================================================================
// PREPROCESSOR
// ============================================================================

/// Scanner that expands directives and imports on top of a stack of lexers.
pub struct Preprocessor {
    search: HeaderSearch,
    max_depth: usize,
    lexer_config: LexerConfig,
    stack: Vec<IncludeEntry>,
    queue: VecDeque<Token>,
    lookahead: Option<Token>,
    statics: BTreeMap<String, String>,
    pragmas: BTreeMap<String, String>,
    /// Files that asked to be read only once.
    once: HashSet<PathBuf>,
    files: SourceMap,
    diagnostics: Diagnostics,
    eof_loc: Location,
    started: bool,
    failed: bool,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(PreprocessorConfig::default())
    }
}

impl Preprocessor {
    /// Create a preprocessor with no source bound; it yields `EndOfFile` until [`Scanner::set_source`] succeeds.
    pub fn new(config: PreprocessorConfig) -> Self {
        Self {
            search: HeaderSearch::new(config.include_dirs),
            max_depth: config.max_include_depth,
            lexer_config: config.lexer,
            stack: Vec::new(),
            queue: VecDeque::new(),
            lookahead: None,
            statics: config.statics,
            pragmas: BTreeMap::new(),
            once: HashSet::new(),
            files: SourceMap::new(),
            diagnostics: Diagnostics::new(),
            eof_loc: Location::UNKNOWN,
            started: false,
            failed: false,
        }
    }

    /// Preprocessor over an in-memory string. Imports resolve relative to `name`'s directory.
    pub fn from_source(source: &str, name: &str, config: PreprocessorConfig) -> Self {
        let mut prep = Self::new(config);
        prep.set_source(Box::new(std::io::Cursor::new(source.as_bytes().to_vec())), name);
        prep
    }

    /// Set a static. Returns `false` once preprocessing has started.
    pub fn set_static(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        if self.started {
            return false;
        }
        self.statics.insert(key.into(), value.into());
        true
    }

    pub fn statics(&self) -> &BTreeMap<String, String> {
        &self.statics
    }

    /// Pragmas recorded so far, other than `once`.
    pub fn pragmas(&self) -> &BTreeMap<String, String> {
        &self.pragmas
    }

    /// Number of files currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// `true` once a directive or import has failed.
    pub fn failed(&self) -> bool {
        self.failed
    }

    // ========================================================================
    // Token production
    // ========================================================================

    fn produce(&mut self) -> Token {
        self.started = true;
        loop {
            if self.failed {
                return Token::eof(self.eof_loc);
            }
            if let Some(token) = self.queue.pop_front() {
                return token;
            }
            let Some(top) = self.stack.last_mut() else {
                return Token::eof(self.eof_loc);
            };
            let token = top.lexer.next();
            self.diagnostics.absorb(top.lexer.take_diagnostics());

            match token.kind {
                TokenKind::MacroSingleLine | TokenKind::MacroBlock => {
                    if let Err(err) = self.expand(&token) {
                        self.fail(&err, token.loc);
                    }
                }
                TokenKind::Keyword if token.is_keyword(KeywordId::Import) => {
                    if let Err(err) = self.import() {
                        self.fail(&err, token.loc);
                    }
                }
                TokenKind::EndOfFile if self.stack.len() > 1 => {
                    if let Some(entry) = self.stack.pop() {
                        tracing::debug!(path = %entry.path.display(), "leave import");
                    }
                }
                TokenKind::EndOfFile => {
                    self.eof_loc = token.loc;
                    return token;
                }
                _ => return token,
            }
        }
    }

    fn fail<E: Reportable>(&mut self, err: &E, loc: Location) {
        self.diagnostics.report(err, loc);
        self.failed = true;
        self.eof_loc = loc;
        self.queue.clear();
        self.stack.clear();
    }

    // ========================================================================
    // Directives
    // ========================================================================

    fn expand(&mut self, token: &Token) -> Result<(), DirectiveError> {
        let (name, params) = directives::split_directive(token.text().unwrap_or_default());
        if name.is_empty() {
            return Err(DirectiveError::Empty);
        }
        let info = directives::lookup(name).ok_or_else(|| DirectiveError::Unknown(name.to_string()))?;
        tracing::debug!(directive = info.name, params, "expand directive");

        let mut ctx = DirectiveContext {
            loc: token.loc,
            current_file: self.stack.last().map(|entry| entry.path.as_path()),
            statics: &self.statics,
            pragmas: &mut self.pragmas,
            once: &mut self.once,
            diagnostics: &mut self.diagnostics,
        };
        let tokens = (info.handler)(&mut ctx, params)?;
        self.queue.extend(tokens);
        Ok(())
    }

    // ========================================================================
    // Imports
    // ========================================================================

    /// Handle `import target;` after the keyword has been consumed.
    fn import(&mut self) -> Result<(), IncludeError> {
        let Some(top) = self.stack.last_mut() else {
            return Ok(());
        };

        let target = top.lexer.next();
        let relative = match target.kind {
            TokenKind::Identifier => module_path(target.text().unwrap_or_default()),
            TokenKind::StringLiteral => PathBuf::from(target.text().unwrap_or_default()),
            _ => return Err(IncludeError::BadTarget),
        };
        if !top.lexer.next().is_punctuation(PunctuationId::Semicolon) {
            return Err(IncludeError::MissingSemicolon);
        }
        self.diagnostics.absorb(top.lexer.take_diagnostics());

        let path = self.search.resolve(&relative, top.dir()).map_err(|searched| IncludeError::NotFound {
            target: relative.display().to_string(),
            searched,
        })?;

        if self.once.contains(&path) {
            tracing::debug!(path = %path.display(), "skip import of once-only file");
            return Ok(());
        }
        if top.visited.contains(&path) {
            let mut chain: Vec<PathBuf> = self.stack.iter().map(|entry| entry.path.clone()).collect();
            chain.push(path.clone());
            return Err(IncludeError::Circular { path, chain });
        }
        if !top.imported.insert(path.clone()) {
            self.diagnostics.emit(
                crate::diagnostics::Severity::Warn,
                target.loc,
                format!("'{}' is already imported here; skipping", path.display()),
            );
            return Ok(());
        }
        if self.stack.len() >= self.max_depth {
            return Err(IncludeError::TooDeep { limit: self.max_depth });
        }

        let lexer = self.open(&path)?;
        tracing::debug!(path = %path.display(), depth = self.stack.len() + 1, "enter import");
        let Some(top) = self.stack.last() else {
            return Ok(());
        };
        let entry = top.child(lexer, path);
        self.stack.push(entry);
        Ok(())
    }

    fn open(&mut self, path: &Path) -> Result<Lexer, IncludeError> {
        let file = File::open(path).map_err(|err| IncludeError::Open {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let id = self.files.add(path.display().to_string());
        Ok(Lexer::for_file(Box::new(BufReader::new(file)), id, self.lexer_config.clone()))
    }
}

// ============================================================================
// SCANNER CAPABILITY
// ============================================================================

impl Scanner for Preprocessor {
    fn next(&mut self) -> Token {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.produce(),
        }
    }

    fn peek(&mut self) -> Token {
        if let Some(token) = &self.lookahead {
            return token.clone();
        }
        let token = self.produce();
        self.lookahead = Some(token.clone());
        token
    }

    fn set_source(&mut self, mut source: Box<dyn BufRead>, name: &str) -> bool {
        if let Err(err) = source.fill_buf() {
            tracing::debug!(name, error = %err, "source is not readable");
            return false;
        }
        let id = self.files.add(name);
        let lexer = Lexer::for_file(source, id, self.lexer_config.clone());
        self.stack = vec![IncludeEntry::root(lexer, canonical(Path::new(name)))];
        self.queue.clear();
        self.lookahead = None;
        self.eof_loc = Location::UNKNOWN;
        self.failed = false;
        true
    }

    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    fn source_map(&self) -> &SourceMap {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::lexer::lex;

    fn drain(scanner: &mut dyn Scanner) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn expand(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut prep = Preprocessor::from_source(source, "main.q", PreprocessorConfig::default());
        let tokens = drain(&mut prep);
        (tokens, prep.take_diagnostics())
    }

    #[test]
    fn define_flag_matches_handwritten_const() {
        let (tokens, diagnostics) = expand("@define FLAG\n");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(tokens, lex("const FLAG: bool = true;").expect("lexes"));
    }

    #[test]
    fn define_limit_matches_handwritten_const() {
        let (tokens, _) = expand("@(define LIMIT 10)");
        assert_eq!(tokens, lex("const LIMIT: i64 = 10;").expect("lexes"));
    }

    #[test]
    fn surrounding_tokens_pass_through() {
        let (tokens, _) = expand("let a: i32;\n@define B false\nlet c: i32;");
        let expected = lex("let a: i32; const B: bool = false; let c: i32;").expect("lexes");
        assert_eq!(tokens, expected);
    }

    #[test]
    fn unknown_directive_latches_failure() {
        let mut prep = Preprocessor::from_source("@bogus 1\nlet x: i32;", "main.q", PreprocessorConfig::default());
        assert!(prep.next().is_eof());
        assert!(prep.failed());
        assert!(prep.next().is_eof());
        let diagnostics = prep.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Fatal);
        assert_eq!(diagnostics[0].code.as_deref(), Some("quix::prep::unknown_directive"));
    }

    #[test]
    fn print_error_fails_job() {
        let (tokens, diagnostics) = expand("@print error \"no\"\nlet x: i32;");
        assert_eq!(tokens.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].message, "no");
    }

    #[test]
    fn statics_lock_after_first_token() {
        let mut prep = Preprocessor::from_source("@static ARCH arch", "main.q", PreprocessorConfig::default());
        assert!(prep.set_static("arch", "riscv"));
        let first = prep.peek();
        assert!(first.is_keyword(KeywordId::Const));
        assert!(!prep.set_static("arch", "arm"));
        let tokens = drain(&mut prep);
        assert_eq!(tokens[5], Token::string("riscv", Location::UNKNOWN));
    }

    #[test]
    fn pragmas_are_recorded() {
        let mut prep = Preprocessor::from_source("@pragma abi c\n", "main.q", PreprocessorConfig::default());
        drain(&mut prep);
        assert_eq!(prep.pragmas().get("abi").map(String::as_str), Some("c"));
    }

    #[test]
    fn missing_import_is_fatal() {
        let (tokens, diagnostics) = expand("import nothing::here;");
        assert_eq!(tokens.len(), 1);
        assert_eq!(diagnostics[0].code.as_deref(), Some("quix::prep::import_not_found"));
    }

    #[test]
    fn import_needs_semicolon() {
        let (_, diagnostics) = expand("import \"x.q\" let");
        assert_eq!(diagnostics[0].code.as_deref(), Some("quix::prep::missing_semicolon"));
    }

    #[test]
    fn synthesized_tokens_carry_directive_location() {
        let (tokens, _) = expand("\n\n  @define X 1\n");
        assert!(tokens[..7].iter().all(|t| t.loc.line == 3));
    }
}
