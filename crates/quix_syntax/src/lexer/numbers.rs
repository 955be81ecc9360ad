//! Numeric literal scanning and width inference.

use quix_core::lang::types::int_width_for;

use super::{Lexer, Token, is_ident_continue};
use crate::diagnostics::LexError;

/// Maximum absolute difference between the `f32` and `f64` readings of a literal for it to be typed `f32`.
pub const FLOAT_EPSILON: f64 = 1e-6;

impl Lexer {
    /// Scan an integer or float literal. The first character is known to be a digit.
    pub(super) fn scan_number(&mut self) -> Token {
        let mut lexeme = String::new();

        let radix = match (self.peek_char(), self.peek_at(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('b' | 'B')) => Some(2),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('d' | 'D')) => Some(10),
            _ => None,
        };

        if let Some(radix) = radix {
            for _ in 0..2 {
                if let Some(c) = self.advance() {
                    lexeme.push(c);
                }
            }
            let digits = self.take_digits(radix, &mut lexeme);
            return self.finish_integer(lexeme, &digits, radix);
        }

        let mut digits = self.take_digits(10, &mut lexeme);
        let mut is_float = false;

        if self.peek_char() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            lexeme.push('.');
            digits.push('.');
            digits.push_str(&self.take_digits(10, &mut lexeme));
            is_float = true;
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    if let Some(c) = self.advance() {
                        lexeme.push(c);
                        digits.push(c);
                    }
                }
                digits.push_str(&self.take_digits(10, &mut lexeme));
                is_float = true;
            }
        }

        if is_float {
            self.finish_float(lexeme, digits)
        } else {
            self.finish_integer(lexeme, &digits, 10)
        }
    }

    /// Consume digits valid in `radix` plus `_` separators; returns the digits without separators.
    fn take_digits(&mut self, radix: u32, lexeme: &mut String) -> String {
        let mut digits = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_digit(radix) {
                digits.push(c);
            } else if c != '_' {
                break;
            }
            lexeme.push(c);
            self.advance();
        }
        digits
    }

    /// Swallow identifier characters glued to a literal (`12abc`) so the error covers the whole word.
    fn take_trailing_garbage(&mut self, lexeme: &mut String) -> bool {
        let mut any = false;
        while let Some(c) = self.peek_char() {
            if !is_ident_continue(c) {
                break;
            }
            lexeme.push(c);
            self.advance();
            any = true;
        }
        any
    }

    fn finish_integer(&mut self, mut lexeme: String, digits: &str, radix: u32) -> Token {
        let garbage = self.take_trailing_garbage(&mut lexeme);
        let loc = self.token_start(lexeme.chars().count());

        if garbage || digits.is_empty() {
            self.error(&LexError::BadNumber(lexeme.clone()), loc);
            return Token::unknown(lexeme, loc);
        }
        match u64::from_str_radix(digits, radix) {
            Ok(value) => Token::integer(value.to_string(), loc),
            Err(_) => {
                self.error(&LexError::IntegerOverflow(lexeme.clone()), loc);
                Token::unknown(lexeme, loc)
            }
        }
    }

    fn finish_float(&mut self, mut lexeme: String, digits: String) -> Token {
        let garbage = self.take_trailing_garbage(&mut lexeme);
        let loc = self.token_start(lexeme.chars().count());

        if garbage || digits.parse::<f64>().is_err() {
            self.error(&LexError::BadNumber(lexeme.clone()), loc);
            return Token::unknown(lexeme, loc);
        }
        Token::float(digits, loc)
    }
}

/// Bit width (8/16/32/64) of a normalised integer literal, or `None` if it is not one.
///
/// ## Examples
/// ```rust
/// use quix_syntax::lexer::int_width;
///
/// assert_eq!(int_width("200"), Some(8));
/// assert_eq!(int_width("70000"), Some(32));
/// assert_eq!(int_width("x"), None);
/// ```
pub fn int_width(text: &str) -> Option<u8> {
    text.parse::<u64>().ok().map(int_width_for)
}

/// Bit width (32/64) of a float literal.
///
/// A literal is 32-bit when reading it as `f32` and widening back agrees with the `f64` reading within
/// [`FLOAT_EPSILON`].
///
/// ## Examples
/// ```rust
/// use quix_syntax::lexer::float_width;
///
/// assert_eq!(float_width("0.5"), Some(32));
/// assert_eq!(float_width("1e300"), Some(64));
/// ```
pub fn float_width(text: &str) -> Option<u8> {
    let wide: f64 = text.parse().ok()?;
    let narrow: f32 = text.parse().ok()?;
    let narrowed = f64::from(narrow);
    if narrowed.is_finite() && (narrowed - wide).abs() < FLOAT_EPSILON {
        Some(32)
    } else {
        Some(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_widths_pick_smallest_fit() {
        assert_eq!(int_width("0"), Some(8));
        assert_eq!(int_width("255"), Some(8));
        assert_eq!(int_width("256"), Some(16));
        assert_eq!(int_width("65536"), Some(32));
        assert_eq!(int_width("4294967296"), Some(64));
    }

    #[test]
    fn float_width_falls_back_to_64_for_precision_loss() {
        assert_eq!(float_width("1.5"), Some(32));
        assert_eq!(float_width("123456789.123456789"), Some(64));
        assert_eq!(float_width("nope"), None);
    }
}
