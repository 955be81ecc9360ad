//! String and character literal scanning.

use super::{Lexer, Token};
use crate::diagnostics::LexError;
use crate::location::Location;

impl Lexer {
    /// Scan a `"..."` literal. Strings may span lines; an unknown escape is reported and kept verbatim.
    pub(super) fn scan_string(&mut self, start: Location) -> Token {
        self.advance();
        let mut text = String::new();
        loop {
            match self.advance() {
                Some('"') => return Token::string(text, start),
                Some('\\') => match self.scan_escape() {
                    Ok(c) => text.push(c),
                    Err(Some(raw)) => {
                        let loc = self.here();
                        self.error(&LexError::UnknownEscape(raw), loc);
                        text.push('\\');
                        text.push(raw);
                    }
                    Err(None) => {
                        self.error(&LexError::UnterminatedString, start);
                        return Token::unknown(format!("\"{text}"), start);
                    }
                },
                Some(c) => text.push(c),
                None => {
                    self.error(&LexError::UnterminatedString, start);
                    return Token::unknown(format!("\"{text}"), start);
                }
            }
        }
    }

    /// Scan a `'x'` literal holding exactly one (possibly escaped) character.
    pub(super) fn scan_char(&mut self, start: Location) -> Token {
        self.advance();

        let value = match self.advance() {
            Some('\\') => match self.scan_escape() {
                Ok(c) => Some(c),
                Err(Some(raw)) => {
                    let loc = self.here();
                    self.error(&LexError::UnknownEscape(raw), loc);
                    Some(raw)
                }
                Err(None) => None,
            },
            Some('\'') | Some('\n') | None => None,
            Some(c) => Some(c),
        };

        match value {
            Some(c) if self.match_char('\'') => Token::char(c, start),
            Some(c) => {
                // Too many characters: skip to the closing quote on this line, if there is one.
                let mut raw = format!("'{c}");
                let mut closed = false;
                while let Some(next) = self.peek_char() {
                    if next == '\n' {
                        break;
                    }
                    self.advance();
                    raw.push(next);
                    if next == '\'' {
                        closed = true;
                        break;
                    }
                }
                let err = if closed {
                    LexError::BadCharLiteral
                } else {
                    LexError::UnterminatedChar
                };
                self.error(&err, start);
                Token::unknown(raw, start)
            }
            None => {
                self.error(&LexError::BadCharLiteral, start);
                Token::unknown("'", start)
            }
        }
    }

    /// Decode the character after a backslash.
    ///
    /// `Err(Some(c))` is an unknown escape `\c`; `Err(None)` means the input ended.
    fn scan_escape(&mut self) -> Result<char, Option<char>> {
        let c = self.advance().ok_or(None)?;
        match c {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            '0' => Ok('\0'),
            '\\' => Ok('\\'),
            '\'' => Ok('\''),
            '"' => Ok('"'),
            'x' => {
                let hi = self.peek_char().and_then(|c| c.to_digit(16));
                let lo = self.peek_at(1).and_then(|c| c.to_digit(16));
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        self.advance();
                        self.advance();
                        char::from_u32(hi * 16 + lo).ok_or(Some('x'))
                    }
                    _ => Err(Some('x')),
                }
            }
            other => Err(Some(other)),
        }
    }
}
