//! Lexer for the quix language.
//!
//! Handles tokenization including:
//! - Keywords and identifiers (including namespaced identifiers such as `std::io`)
//! - Integer literals (decimal, `0x`, `0b`, `0o`, `0d`, with `_` separators) and float literals
//! - String and character literals with escapes
//! - Operators (longest match first) and punctuation
//! - Macro markers: `@name rest-of-line` and `@( balanced block )`
//! - Comments: `//`, `/* */`, `~>` and `# `
//!
//! The lexer reads its source lazily, one line at a time, so a large file never has to be held in memory and an
//! import only costs what the parser actually pulls.
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, TokenValue, Token)
//! - `numbers` - Numeric literal scanning and width inference
//! - `strings` - String/char literal scanning
//!
//! ## Notes
//! - A bad byte yields an `Unknown` token plus an error diagnostic; lexing continues.
//! - After the input is exhausted every call yields `EndOfFile`.

mod numbers;
mod strings;
pub mod tokens;

pub use numbers::{FLOAT_EPSILON, float_width, int_width};
pub use tokens::{Token, TokenKind, TokenValue, keyword_id};

use std::io::{BufRead, Cursor};

use quix_core::lang::operators::{self, MAX_SPELLING_LEN};
use quix_core::lang::punctuation;

use crate::diagnostics::{Diagnostic, Diagnostics, LexError};
use crate::location::{FileId, Location, SourceMap};
use crate::scanner::Scanner;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Lexer options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexerConfig {
    /// Yield `Comment` tokens instead of skipping comments.
    pub keep_comments: bool,
}

impl LexerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }
}

// ============================================================================
// LEXER STATE
// ============================================================================

/// Streaming lexer over one source buffer.
///
/// Implements [`Scanner`]; `peek` is served from a single-token lookahead slot.
pub struct Lexer {
    source: Option<Box<dyn BufRead>>,
    file: FileId,
    files: SourceMap,
    config: LexerConfig,
    /// Characters of the current line, including its trailing `\n`.
    line_buf: Vec<char>,
    /// Indices into `line_buf` that stand for undecodable bytes.
    invalid: Vec<usize>,
    pos: usize,
    /// 1-based line of the next unread character.
    line: i64,
    /// Characters already consumed on the current line.
    column: i64,
    input_done: bool,
    lookahead: Option<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    /// Create a lexer with no source bound; it yields `EndOfFile` until [`Scanner::set_source`] succeeds.
    pub fn new() -> Self {
        Self::with_config(LexerConfig::default())
    }

    pub fn with_config(config: LexerConfig) -> Self {
        Self {
            source: None,
            file: FileId::UNKNOWN,
            files: SourceMap::new(),
            config,
            line_buf: Vec::new(),
            invalid: Vec::new(),
            pos: 0,
            line: 1,
            column: 0,
            input_done: true,
            lookahead: None,
            diagnostics: Vec::new(),
        }
    }

    /// Lexer over an in-memory string.
    pub fn from_source(source: &str, name: &str) -> Self {
        let mut lexer = Self::new();
        lexer.set_source(Box::new(Cursor::new(source.as_bytes().to_vec())), name);
        lexer
    }

    /// Lexer over `source` whose locations point at an already registered `file`.
    ///
    /// Used by the preprocessor, which owns the job's [`SourceMap`].
    pub(crate) fn for_file(source: Box<dyn BufRead>, file: FileId, config: LexerConfig) -> Self {
        let mut lexer = Self::with_config(config);
        lexer.bind(source, file);
        lexer
    }

    fn bind(&mut self, source: Box<dyn BufRead>, file: FileId) {
        self.source = Some(source);
        self.file = file;
        self.line_buf.clear();
        self.invalid.clear();
        self.pos = 0;
        self.line = 1;
        self.column = 0;
        self.input_done = false;
        self.lookahead = None;
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    /// Make sure `line_buf[pos]` is readable, pulling the next line if needed.
    fn fill(&mut self) -> bool {
        while self.pos >= self.line_buf.len() {
            if self.input_done {
                return false;
            }
            let Some(source) = self.source.as_mut() else {
                self.input_done = true;
                return false;
            };
            let mut raw = Vec::new();
            match source.read_until(b'\n', &mut raw) {
                Ok(0) => {
                    self.input_done = true;
                    self.source = None;
                    return false;
                }
                Ok(_) => {
                    self.decode_line(&raw);
                    self.pos = 0;
                }
                Err(err) => {
                    let loc = self.here();
                    self.error(&LexError::Read(err.to_string()), loc);
                    self.input_done = true;
                    self.source = None;
                    return false;
                }
            }
        }
        true
    }

    /// Decode one raw line into `line_buf`. Each undecodable byte run becomes a single
    /// `char::REPLACEMENT_CHARACTER` whose index is recorded in `invalid`.
    fn decode_line(&mut self, raw: &[u8]) {
        self.line_buf.clear();
        self.invalid.clear();
        for chunk in raw.utf8_chunks() {
            self.line_buf.extend(chunk.valid().chars());
            if !chunk.invalid().is_empty() {
                self.invalid.push(self.line_buf.len());
                self.line_buf.push(char::REPLACEMENT_CHARACTER);
            }
        }
    }

    /// `true` if the next character was decoded from invalid bytes.
    fn at_invalid(&mut self) -> bool {
        self.fill() && self.invalid.binary_search(&self.pos).is_ok()
    }

    fn peek_char(&mut self) -> Option<char> {
        if self.fill() { self.line_buf.get(self.pos).copied() } else { None }
    }

    /// Look `offset` characters past the next one, within the current line.
    fn peek_at(&mut self, offset: usize) -> Option<char> {
        if !self.fill() {
            return None;
        }
        self.line_buf.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Location of the last consumed character.
    fn here(&self) -> Location {
        Location::new(self.line, self.column, self.file)
    }

    /// Location of the next character to be consumed.
    fn next_loc(&self) -> Location {
        Location::new(self.line, self.column + 1, self.file)
    }

    /// Start of a single-line token of `len` characters that has just been consumed.
    fn token_start(&self, len: usize) -> Location {
        self.here().rewind(len.saturating_sub(1) as i64)
    }

    fn error(&mut self, err: &LexError, loc: Location) {
        let mut sink = Diagnostics::new();
        sink.report(err, loc);
        self.diagnostics.extend(sink.take());
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan(&mut self) -> Token {
        loop {
            while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
                self.advance();
            }

            let start = self.next_loc();
            let Some(c) = self.peek_char() else {
                return Token::eof(start);
            };

            let comment = match c {
                '/' if self.peek_at(1) == Some('/') => Some(self.scan_line_comment(2)),
                '~' if self.peek_at(1) == Some('>') => Some(self.scan_line_comment(2)),
                '#' if self.peek_at(1).is_none_or(char::is_whitespace) => Some(self.scan_line_comment(1)),
                '/' if self.peek_at(1) == Some('*') => Some(self.scan_block_comment(start)),
                _ => None,
            };
            if let Some(comment) = comment {
                match comment {
                    Some(text) if self.config.keep_comments => {
                        return Token::new(TokenKind::Comment, TokenValue::Text(text), start);
                    }
                    _ => continue,
                }
            }

            if self.at_invalid() {
                self.advance();
                self.error(&LexError::InvalidUtf8, start);
                return Token::unknown(c.to_string(), start);
            }

            let token = match c {
                '@' => self.scan_macro(start),
                '"' => self.scan_string(start),
                '\'' => self.scan_char(start),
                '0'..='9' => self.scan_number(),
                _ if is_ident_start(c) => self.scan_identifier(),
                _ => {
                    if let Some(id) = punctuation::from_char(c) {
                        self.advance();
                        Token::punctuator(id, start)
                    } else if let Some(token) = self.scan_operator(start) {
                        token
                    } else {
                        self.advance();
                        self.error(&LexError::UnexpectedCharacter(c), start);
                        Token::unknown(c.to_string(), start)
                    }
                }
            };
            return token;
        }
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Skip a line comment whose marker is `marker_len` characters long; returns its text.
    fn scan_line_comment(&mut self, marker_len: usize) -> Option<String> {
        for _ in 0..marker_len {
            self.advance();
        }
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        Some(text.trim().to_string())
    }

    /// Skip a `/* ... */` comment. Returns `None` (after reporting) when it never closes.
    fn scan_block_comment(&mut self, start: Location) -> Option<String> {
        self.advance();
        self.advance();
        let mut text = String::new();
        loop {
            match self.advance() {
                Some('*') if self.peek_char() == Some('/') => {
                    self.advance();
                    return Some(text.trim().to_string());
                }
                Some(c) => text.push(c),
                None => {
                    self.error(&LexError::UnterminatedComment, start);
                    return None;
                }
            }
        }
    }

    // ========================================================================
    // Macro markers
    // ========================================================================

    fn scan_macro(&mut self, start: Location) -> Token {
        self.advance();

        if self.match_char('(') {
            let mut depth = 1usize;
            let mut text = String::new();
            loop {
                match self.advance() {
                    Some('(') => {
                        depth += 1;
                        text.push('(');
                    }
                    Some(')') => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                        text.push(')');
                    }
                    Some(c) => text.push(c),
                    None => {
                        self.error(&LexError::UnterminatedMacro, start);
                        return Token::unknown(format!("@({text}"), start);
                    }
                }
            }
            return Token::new(TokenKind::MacroBlock, TokenValue::Text(text.trim().to_string()), start);
        }

        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        Token::new(
            TokenKind::MacroSingleLine,
            TokenValue::Text(text.trim().to_string()),
            start,
        )
    }

    // ========================================================================
    // Identifiers and operators
    // ========================================================================

    fn scan_identifier(&mut self) -> Token {
        let mut spelling = String::new();
        self.take_ident_segment(&mut spelling);

        let mut namespaced = false;
        while self.peek_char() == Some(':')
            && self.peek_at(1) == Some(':')
            && self.peek_at(2).is_some_and(is_ident_start)
        {
            self.advance();
            self.advance();
            spelling.push_str("::");
            self.take_ident_segment(&mut spelling);
            namespaced = true;
        }

        let loc = self.token_start(spelling.chars().count());
        match keyword_id(&spelling) {
            Some(id) if !namespaced => Token::keyword(id, loc),
            _ => Token::identifier(spelling, loc),
        }
    }

    fn take_ident_segment(&mut self, out: &mut String) {
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                out.push(c);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Longest registered operator spelling starting at the next character.
    fn scan_operator(&mut self, start: Location) -> Option<Token> {
        for len in (1..=MAX_SPELLING_LEN).rev() {
            let candidate: Option<String> = (0..len).map(|i| self.peek_at(i)).collect();
            let Some(candidate) = candidate else {
                continue;
            };
            if let Some(id) = operators::from_str(&candidate) {
                for _ in 0..len {
                    self.advance();
                }
                return Some(Token::operator(id, start));
            }
        }
        None
    }
}

// ============================================================================
// SCANNER CAPABILITY
// ============================================================================

impl Scanner for Lexer {
    fn next(&mut self) -> Token {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.scan(),
        }
    }

    fn peek(&mut self) -> Token {
        if let Some(token) = &self.lookahead {
            return token.clone();
        }
        let token = self.scan();
        self.lookahead = Some(token.clone());
        token
    }

    fn set_source(&mut self, mut source: Box<dyn BufRead>, name: &str) -> bool {
        if let Err(err) = source.fill_buf() {
            tracing::debug!(name, error = %err, "source is not readable");
            return false;
        }
        let file = self.files.add(name);
        self.bind(source, file);
        true
    }

    fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn source_map(&self) -> &SourceMap {
        &self.files
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ============================================================================
// CONVENIENCE ENTRY POINT
// ============================================================================

/// Tokenize an in-memory source.
///
/// Returns every token (ending with `EndOfFile`) when no diagnostic was raised, or the diagnostics otherwise.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<Diagnostic>> {
    let mut lexer = Lexer::from_source(source, "<input>");
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next();
        let done = token.is_eof();
        tokens.push(token);
        if done {
            break;
        }
    }
    let diagnostics = lexer.take_diagnostics();
    if diagnostics.is_empty() { Ok(tokens) } else { Err(diagnostics) }
}
