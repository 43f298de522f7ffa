//! Literal scanning for the Go lexer
//!
//! Numbers, runes and strings are returned as raw source text. Only the
//! shape of the literal is validated here; values are never computed.

use crate::lexer::{Lexer, TokenType};
use gir_common::BridgeError;

fn radix_name(radix: u32) -> &'static str {
    match radix {
        2 => "binary",
        8 => "octal",
        16 => "hexadecimal",
        _ => "decimal",
    }
}

impl Lexer {
    /// Collect digits (and `_` separators) valid for a literal of `radix`.
    ///
    /// Decimal digits are accepted for binary and octal literals so the
    /// error can name the offending digit.
    fn take_digits(&mut self, text: &mut String, radix: u32) -> Result<usize, BridgeError> {
        let mut count = 0;
        while let Some(ch) = self.current_char() {
            let accepted = match radix {
                16 => ch.is_ascii_hexdigit(),
                _ => ch.is_ascii_digit(),
            };
            if ch == '_' {
                text.push(ch);
                self.advance();
                continue;
            }
            if !accepted {
                break;
            }
            if ch.to_digit(10).is_some_and(|d| radix < 10 && d >= radix) {
                return Err(self.error_at(
                    format!("invalid digit '{}' in {} literal", ch, radix_name(radix)),
                    self.current_location(),
                ));
            }
            text.push(ch);
            self.advance();
            count += 1;
        }
        Ok(count)
    }

    /// Tokenize an integer, floating-point or imaginary literal
    pub fn tokenize_number(&mut self) -> Result<TokenType, BridgeError> {
        let start = self.current_location();
        let mut text = String::new();
        let mut radix = 10;
        let mut is_float = false;

        if self.current_char() == Some('0') {
            let prefix = match self.peek_char(1) {
                Some('x') | Some('X') => 16,
                Some('b') | Some('B') => 2,
                Some('o') | Some('O') => 8,
                _ => 10,
            };
            if prefix != 10 {
                radix = prefix;
                for _ in 0..2 {
                    if let Some(ch) = self.advance() {
                        text.push(ch);
                    }
                }
            }
        }

        let mut digits = self.take_digits(&mut text, radix)?;

        if self.current_char() == Some('.') {
            if radix == 2 || radix == 8 {
                return Err(self.error_at(
                    format!("invalid radix point in {} literal", radix_name(radix)),
                    self.current_location(),
                ));
            }
            is_float = true;
            text.push('.');
            self.advance();
            digits += self.take_digits(&mut text, radix)?;
        }

        if digits == 0 {
            return Err(self.error_at(
                format!("{} literal has no digits", radix_name(radix)),
                start,
            ));
        }

        let exponent = match (radix, self.current_char()) {
            (10, Some(e @ ('e' | 'E'))) | (16, Some(e @ ('p' | 'P'))) => Some(e),
            _ => None,
        };
        if let Some(e) = exponent {
            is_float = true;
            text.push(e);
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.current_char() {
                text.push(sign);
                self.advance();
            }
            if self.take_digits(&mut text, 10)? == 0 {
                return Err(self.error_at("exponent has no digits", self.current_location()));
            }
        } else if radix == 16 && is_float {
            return Err(self.error_at(
                "hexadecimal mantissa requires a 'p' exponent",
                self.current_location(),
            ));
        }

        let imaginary = self.follow('i');
        if imaginary {
            text.push('i');
        }

        if let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                return Err(self.error_at(
                    format!("invalid character '{}' in numeric literal", ch),
                    self.current_location(),
                ));
            }
        }

        if imaginary {
            return Ok(TokenType::ImagLiteral(text));
        }
        if is_float {
            return Ok(TokenType::FloatLiteral(text));
        }

        // Legacy octal: 0777
        if radix == 10 && text.len() > 1 && text.starts_with('0') {
            if let Some(bad) = text.chars().find(|c| matches!(c, '8' | '9')) {
                return Err(self.error_at(
                    format!("invalid digit '{}' in octal literal", bad),
                    start,
                ));
            }
        }

        Ok(TokenType::IntLiteral(text))
    }

    /// Scan a quoted literal body up to `quote`, honouring backslash escapes.
    fn take_quoted(&mut self, quote: char, what: &str) -> Result<String, BridgeError> {
        let start = self.current_location();
        let mut text = String::new();
        if let Some(open) = self.advance() {
            text.push(open);
        }

        loop {
            match self.current_char() {
                None | Some('\n') => {
                    return Err(self.error_at(format!("{} literal not terminated", what), start));
                }
                Some('\\') => {
                    text.push('\\');
                    self.advance();
                    match self.advance() {
                        Some(escaped) if escaped != '\n' => text.push(escaped),
                        _ => {
                            return Err(
                                self.error_at(format!("{} literal not terminated", what), start)
                            );
                        }
                    }
                }
                Some(ch) if ch == quote => {
                    text.push(ch);
                    self.advance();
                    return Ok(text);
                }
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }
    }

    /// Tokenize a rune literal such as `'a'` or `'\n'`
    pub fn tokenize_rune(&mut self) -> Result<TokenType, BridgeError> {
        let start = self.current_location();
        let text = self.take_quoted('\'', "rune")?;
        if text == "''" {
            return Err(self.error_at("empty rune literal or unescaped ' in rune literal", start));
        }
        Ok(TokenType::CharLiteral(text))
    }

    /// Tokenize an interpreted string literal
    pub fn tokenize_string(&mut self) -> Result<TokenType, BridgeError> {
        Ok(TokenType::StringLiteral(self.take_quoted('"', "string")?))
    }

    /// Tokenize a raw string literal; carriage returns are dropped from the text.
    pub fn tokenize_raw_string(&mut self) -> Result<TokenType, BridgeError> {
        let start = self.current_location();
        let mut text = String::new();
        if let Some(open) = self.advance() {
            text.push(open);
        }

        loop {
            match self.advance() {
                None => return Err(self.error_at("raw string literal not terminated", start)),
                Some('`') => {
                    text.push('`');
                    return Ok(TokenType::StringLiteral(text));
                }
                Some('\r') => {}
                Some(ch) => text.push(ch),
            }
        }
    }
}
