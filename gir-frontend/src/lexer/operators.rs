//! Operator and comment scanning for the Go lexer

use crate::lexer::{Lexer, TokenType};
use gir_common::BridgeError;

impl Lexer {
    /// Tokenize line comment; the terminating newline is not consumed.
    pub fn tokenize_line_comment(&mut self) -> TokenType {
        let mut comment = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            comment.push(ch);
            self.advance();
        }
        if comment.ends_with('\r') {
            comment.pop();
        }

        TokenType::Comment(comment)
    }

    /// Tokenize block comment
    pub fn tokenize_block_comment(&mut self) -> Result<TokenType, BridgeError> {
        let start = self.current_location();
        let mut comment = String::from("/*");
        self.advance();
        self.advance();

        loop {
            match self.current_char() {
                None => return Err(self.error_at("comment not terminated", start)),
                Some('*') if self.peek_char(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    comment.push_str("*/");
                    return Ok(TokenType::Comment(comment));
                }
                Some(ch) => {
                    comment.push(ch);
                    self.advance();
                }
            }
        }
    }

    /// `base`, or `with_equal` when the next character is `=`.
    fn equal_variant(&mut self, base: TokenType, with_equal: TokenType) -> TokenType {
        if self.follow('=') {
            with_equal
        } else {
            base
        }
    }

    /// Tokenize an operator or delimiter
    pub fn tokenize_operator(&mut self) -> Result<TokenType, BridgeError> {
        let start = self.current_location();
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Ok(TokenType::EndOfFile),
        };

        let token_type = match ch {
            '+' => {
                if self.follow('+') {
                    TokenType::PlusPlus
                } else {
                    self.equal_variant(TokenType::Plus, TokenType::PlusEqual)
                }
            }
            '-' => {
                if self.follow('-') {
                    TokenType::MinusMinus
                } else {
                    self.equal_variant(TokenType::Minus, TokenType::MinusEqual)
                }
            }
            '*' => self.equal_variant(TokenType::Star, TokenType::StarEqual),
            '/' => self.equal_variant(TokenType::Slash, TokenType::SlashEqual),
            '%' => self.equal_variant(TokenType::Percent, TokenType::PercentEqual),
            '&' => {
                if self.follow('&') {
                    TokenType::AmpersandAmpersand
                } else if self.follow('^') {
                    self.equal_variant(TokenType::AndNot, TokenType::AndNotEqual)
                } else {
                    self.equal_variant(TokenType::Ampersand, TokenType::AmpersandEqual)
                }
            }
            '|' => {
                if self.follow('|') {
                    TokenType::PipePipe
                } else {
                    self.equal_variant(TokenType::Pipe, TokenType::PipeEqual)
                }
            }
            '^' => self.equal_variant(TokenType::Caret, TokenType::CaretEqual),
            '<' => {
                if self.follow('-') {
                    TokenType::Arrow
                } else if self.follow('<') {
                    self.equal_variant(TokenType::LeftShift, TokenType::LeftShiftEqual)
                } else {
                    self.equal_variant(TokenType::Less, TokenType::LessEqual)
                }
            }
            '>' => {
                if self.follow('>') {
                    self.equal_variant(TokenType::RightShift, TokenType::RightShiftEqual)
                } else {
                    self.equal_variant(TokenType::Greater, TokenType::GreaterEqual)
                }
            }
            '=' => self.equal_variant(TokenType::Equal, TokenType::EqualEqual),
            '!' => self.equal_variant(TokenType::Bang, TokenType::BangEqual),
            ':' => self.equal_variant(TokenType::Colon, TokenType::ColonEqual),
            '.' => {
                if self.current_char() == Some('.') && self.peek_char(1) == Some('.') {
                    self.advance();
                    self.advance();
                    TokenType::Ellipsis
                } else {
                    TokenType::Dot
                }
            }
            ',' => TokenType::Comma,
            ';' => TokenType::Semicolon,
            '(' => TokenType::LeftParen,
            ')' => TokenType::RightParen,
            '[' => TokenType::LeftBracket,
            ']' => TokenType::RightBracket,
            '{' => TokenType::LeftBrace,
            '}' => TokenType::RightBrace,
            other => {
                return Err(self.error_at(format!("unexpected character '{}'", other), start));
            }
        };

        Ok(token_type)
    }
}
