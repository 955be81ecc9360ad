//! Built-in macro directives.
//!
//! A directive is the text of a `@name params` or `@( name params )` token. [`DIRECTIVES`] maps each name to a
//! handler; the table is `const`, so every preprocessor in the process shares it without locking.
//!
//! | directive | effect |
//! |-----------|--------|
//! | `define NAME [VALUE]` | emits `const NAME: <type> = <value>;` |
//! | `static NAME KEY` | like `define`, with the value of the host-provided static `KEY` |
//! | `pragma once` / `pragma KEY [VALUE]` | records state, emits nothing |
//! | `print [level] MESSAGE` | reports MESSAGE, emits nothing; level `error` fails the job |

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use quix_core::lang::keywords::KeywordId;
use quix_core::lang::operators::OperatorId;
use quix_core::lang::punctuation::PunctuationId;

use crate::diagnostics::{DirectiveError, Diagnostics, Severity};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::location::Location;
use crate::scanner::Scanner;

/// State a directive handler may read or update.
pub struct DirectiveContext<'a> {
    pub(crate) loc: Location,
    pub(crate) current_file: Option<&'a Path>,
    pub(crate) statics: &'a BTreeMap<String, String>,
    pub(crate) pragmas: &'a mut BTreeMap<String, String>,
    pub(crate) once: &'a mut HashSet<PathBuf>,
    pub(crate) diagnostics: &'a mut Diagnostics,
}

/// Expand one directive given its parameter text.
pub type DirectiveHandler = fn(&mut DirectiveContext<'_>, &str) -> Result<Vec<Token>, DirectiveError>;

/// Metadata for a directive.
#[derive(Clone, Copy)]
pub struct DirectiveInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub handler: DirectiveHandler,
}

impl std::fmt::Debug for DirectiveInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveInfo")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// Registry of all built-in directives.
pub const DIRECTIVES: &[DirectiveInfo] = &[
    DirectiveInfo {
        name: "define",
        usage: "define NAME [VALUE]",
        handler: define,
    },
    DirectiveInfo {
        name: "static",
        usage: "static NAME KEY",
        handler: static_value,
    },
    DirectiveInfo {
        name: "pragma",
        usage: "pragma KEY [VALUE]",
        handler: pragma,
    },
    DirectiveInfo {
        name: "print",
        usage: "print [level] MESSAGE",
        handler: print,
    },
];

/// Find a directive by name.
pub fn lookup(name: &str) -> Option<&'static DirectiveInfo> {
    DIRECTIVES.iter().find(|d| d.name == name)
}

/// Split directive text into `(name, params)`.
pub fn split_directive(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((name, params)) => (name, params.trim()),
        None => (text, ""),
    }
}

// ============================================================================
// define / static
// ============================================================================

/// Literal kind inferred for a `define` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefineValue {
    Bool(bool),
    Int(String),
    Str(String),
}

impl DefineValue {
    /// `true`/`false` are booleans, all-digit text that fits in an `i64` is an integer, anything else a string.
    pub fn infer(raw: &str) -> Self {
        let raw = raw.trim();
        match raw {
            "true" => return DefineValue::Bool(true),
            "false" => return DefineValue::Bool(false),
            _ => {}
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(v) = raw.parse::<i64>() {
                return DefineValue::Int(v.to_string());
            }
        }
        let unquoted = raw
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(raw);
        DefineValue::Str(unquoted.to_string())
    }

    fn type_name(&self) -> &'static str {
        match self {
            DefineValue::Bool(_) => "bool",
            DefineValue::Int(_) => "i64",
            DefineValue::Str(_) => "string",
        }
    }

    fn token(&self, loc: Location) -> Token {
        match self {
            DefineValue::Bool(true) => Token::keyword(KeywordId::True, loc),
            DefineValue::Bool(false) => Token::keyword(KeywordId::False, loc),
            DefineValue::Int(v) => Token::integer(v.clone(), loc),
            DefineValue::Str(s) => Token::string(s.clone(), loc),
        }
    }
}

/// Tokens for `const NAME: <type> = <value>;`, all located at `loc`.
pub fn const_tokens(name: &str, value: &DefineValue, loc: Location) -> Vec<Token> {
    vec![
        Token::keyword(KeywordId::Const, loc),
        Token::identifier(name, loc),
        Token::punctuator(PunctuationId::Colon, loc),
        Token::identifier(value.type_name(), loc),
        Token::operator(OperatorId::Eq, loc),
        value.token(loc),
        Token::punctuator(PunctuationId::Semicolon, loc),
    ]
}

fn check_name(name: &str) -> Result<(), DirectiveError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid { Ok(()) } else { Err(DirectiveError::BadName(name.to_string())) }
}

fn define(ctx: &mut DirectiveContext<'_>, params: &str) -> Result<Vec<Token>, DirectiveError> {
    let (name, raw) = split_directive(params);
    if name.is_empty() {
        return Err(DirectiveError::BadArguments {
            directive: "define",
            expected: "a name and an optional value",
        });
    }
    check_name(name)?;

    let value = if raw.is_empty() {
        DefineValue::Bool(true)
    } else {
        DefineValue::infer(raw)
    };
    tracing::debug!(name, ?value, "define");
    Ok(const_tokens(name, &value, ctx.loc))
}

fn static_value(ctx: &mut DirectiveContext<'_>, params: &str) -> Result<Vec<Token>, DirectiveError> {
    let (name, key) = split_directive(params);
    if name.is_empty() || key.is_empty() || key.contains(char::is_whitespace) {
        return Err(DirectiveError::BadArguments {
            directive: "static",
            expected: "a name and a static key",
        });
    }
    check_name(name)?;

    let raw = ctx
        .statics
        .get(key)
        .ok_or_else(|| DirectiveError::UnknownStatic(key.to_string()))?;
    Ok(const_tokens(name, &DefineValue::infer(raw), ctx.loc))
}

// ============================================================================
// pragma
// ============================================================================

fn pragma(ctx: &mut DirectiveContext<'_>, params: &str) -> Result<Vec<Token>, DirectiveError> {
    let (key, value) = split_directive(params);
    if key.is_empty() {
        return Err(DirectiveError::BadArguments {
            directive: "pragma",
            expected: "a pragma name",
        });
    }

    if key == "once" {
        if let Some(path) = ctx.current_file {
            ctx.once.insert(path.to_path_buf());
        }
    } else {
        ctx.pragmas.insert(key.to_string(), value.to_string());
    }
    Ok(Vec::new())
}

// ============================================================================
// print
// ============================================================================

fn print_level(word: &str) -> Option<Severity> {
    match word {
        "debug" => Some(Severity::Debug),
        "info" | "ok" | "good" | "success" | "raw" => Some(Severity::Info),
        "warn" | "warning" => Some(Severity::Warn),
        "error" | "err" => Some(Severity::Error),
        _ => None,
    }
}

fn print(ctx: &mut DirectiveContext<'_>, params: &str) -> Result<Vec<Token>, DirectiveError> {
    let mut lexer = Lexer::from_source(params, "<print>");
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next();
        if token.is_eof() {
            break;
        }
        tokens.push(token);
    }

    let mut severity = Severity::Info;
    let mut skip = 0;
    if let [first, rest @ ..] = tokens.as_slice() {
        let level = first.ident_name().and_then(print_level);
        if let (Some(level), false) = (level, rest.is_empty()) {
            severity = level;
            skip = if rest[0].is_punctuation(PunctuationId::Comma) { 2 } else { 1 };
        }
    }

    let message_tokens = &tokens[skip.min(tokens.len())..];
    let message = match message_tokens {
        [only] if only.kind == TokenKind::StringLiteral => only.spelling(),
        _ => {
            let mut raw = params.trim();
            if skip > 0 {
                raw = raw.split_once(char::is_whitespace).map_or("", |(_, rest)| rest).trim();
                if skip == 2 {
                    raw = raw.trim_start_matches(',').trim();
                }
            }
            raw.to_string()
        }
    };

    if message.is_empty() {
        return Err(DirectiveError::BadArguments {
            directive: "print",
            expected: "a message",
        });
    }

    if severity.is_failure() {
        return Err(DirectiveError::UserError(message));
    }
    ctx.diagnostics.emit(severity, ctx.loc, message);
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        statics: BTreeMap<String, String>,
        pragmas: BTreeMap<String, String>,
        once: HashSet<PathBuf>,
        diagnostics: Diagnostics,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                statics: BTreeMap::from([("arch".to_string(), "x86_64".to_string())]),
                pragmas: BTreeMap::new(),
                once: HashSet::new(),
                diagnostics: Diagnostics::new(),
            }
        }

        fn run(&mut self, text: &str) -> Result<Vec<Token>, DirectiveError> {
            let (name, params) = split_directive(text);
            let info = lookup(name).ok_or_else(|| DirectiveError::Unknown(name.to_string()))?;
            let mut ctx = DirectiveContext {
                loc: Location::UNKNOWN,
                current_file: Some(Path::new("/src/main.q")),
                statics: &self.statics,
                pragmas: &mut self.pragmas,
                once: &mut self.once,
                diagnostics: &mut self.diagnostics,
            };
            (info.handler)(&mut ctx, params)
        }
    }

    fn spellings(tokens: &[Token]) -> Vec<String> {
        tokens.iter().map(Token::to_string).collect()
    }

    #[test]
    fn define_infers_literal_kinds() {
        assert_eq!(DefineValue::infer("true"), DefineValue::Bool(true));
        assert_eq!(DefineValue::infer("10"), DefineValue::Int("10".into()));
        assert_eq!(DefineValue::infer("-10"), DefineValue::Str("-10".into()));
        assert_eq!(DefineValue::infer("\"hi there\""), DefineValue::Str("hi there".into()));
        assert_eq!(
            DefineValue::infer("99999999999999999999999"),
            DefineValue::Str("99999999999999999999999".into())
        );
    }

    #[test]
    fn define_integers_stay_within_i64() {
        assert_eq!(
            DefineValue::infer("9223372036854775807"),
            DefineValue::Int("9223372036854775807".into())
        );
        assert_eq!(
            DefineValue::infer("9223372036854775808"),
            DefineValue::Str("9223372036854775808".into())
        );

        let tokens = Fixture::new().run("define BIG 18446744073709551615").expect("expands");
        assert_eq!(spellings(&tokens)[3], "Identifier(string)");
    }

    #[test]
    fn define_without_value_is_true() {
        let tokens = Fixture::new().run("define FLAG").expect("expands");
        assert_eq!(
            spellings(&tokens),
            [
                "Keyword(const)",
                "Identifier(FLAG)",
                "Punctor(:)",
                "Identifier(bool)",
                "Operator(=)",
                "Keyword(true)",
                "Punctor(;)"
            ]
        );
    }

    #[test]
    fn define_rejects_bad_names() {
        assert_eq!(
            Fixture::new().run("define 9lives"),
            Err(DirectiveError::BadName("9lives".into()))
        );
    }

    #[test]
    fn static_reads_host_table() {
        let tokens = Fixture::new().run("static ARCH arch").expect("expands");
        assert_eq!(tokens[3], Token::identifier("string", Location::UNKNOWN));
        assert_eq!(tokens[5], Token::string("x86_64", Location::UNKNOWN));
        assert_eq!(
            Fixture::new().run("static ARCH os"),
            Err(DirectiveError::UnknownStatic("os".into()))
        );
    }

    #[test]
    fn pragma_records_state() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("pragma optimize size"), Ok(Vec::new()));
        assert_eq!(fx.pragmas.get("optimize").map(String::as_str), Some("size"));
        fx.run("pragma once").expect("once");
        assert!(fx.once.contains(Path::new("/src/main.q")));
    }

    #[test]
    fn print_reports_at_requested_level() {
        let mut fx = Fixture::new();
        fx.run("print warn, \"careful now\"").expect("prints");
        fx.run("print plain words").expect("prints");
        let entries: Vec<_> = fx.diagnostics.iter().map(|d| (d.severity, d.message.clone())).collect();
        assert_eq!(
            entries,
            [
                (Severity::Warn, "careful now".to_string()),
                (Severity::Info, "plain words".to_string())
            ]
        );
    }

    #[test]
    fn print_error_fails() {
        assert_eq!(
            Fixture::new().run("print error \"stop\""),
            Err(DirectiveError::UserError("stop".into()))
        );
    }

    #[test]
    fn unknown_directive() {
        assert_eq!(
            Fixture::new().run("frobnicate x"),
            Err(DirectiveError::Unknown("frobnicate".into()))
        );
    }
}
