//! Go Lexer
//!
//! Tokenizes Go source code into a stream of tokens.
//! Handles keywords, operators, literals, identifiers and comments, and
//! inserts the implicit semicolons the Go grammar relies on: a newline (or
//! the end of input) after an identifier, a literal, one of the keywords
//! `break continue fallthrough return`, `++`, `--`, `)`, `]` or `}` becomes
//! a zero-width `Semicolon` token.

pub mod token;
pub mod literals;
pub mod operators;

pub use token::{Token, TokenType};

use gir_common::{BridgeError, SourcePosition, SourceSpan};
use std::collections::HashMap;

/// Go Lexer
pub struct Lexer {
    pub(crate) input: Vec<char>,
    pub(crate) position: usize,
    pub(crate) offset: i64,
    pub(crate) line: i64,
    pub(crate) column: i64,
    filename: String,
    insert_semicolon: bool,
    keywords: HashMap<&'static str, TokenType>,
}

impl Lexer {
    /// Create a new lexer
    pub fn new(input: &str, filename: &str) -> Self {
        let mut lexer = Self {
            input: input.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
            filename: filename.to_string(),
            insert_semicolon: false,
            keywords: HashMap::new(),
        };

        lexer.initialize_keywords();
        // A leading byte order mark is not part of the source.
        if lexer.current_char() == Some('\u{feff}') {
            lexer.advance();
        }
        lexer
    }

    fn initialize_keywords(&mut self) {
        let keywords = [
            ("break", TokenType::Break),
            ("case", TokenType::Case),
            ("chan", TokenType::Chan),
            ("const", TokenType::Const),
            ("continue", TokenType::Continue),
            ("default", TokenType::Default),
            ("defer", TokenType::Defer),
            ("else", TokenType::Else),
            ("fallthrough", TokenType::Fallthrough),
            ("for", TokenType::For),
            ("func", TokenType::Func),
            ("go", TokenType::Go),
            ("goto", TokenType::Goto),
            ("if", TokenType::If),
            ("import", TokenType::Import),
            ("interface", TokenType::Interface),
            ("map", TokenType::Map),
            ("package", TokenType::Package),
            ("range", TokenType::Range),
            ("return", TokenType::Return),
            ("select", TokenType::Select),
            ("struct", TokenType::Struct),
            ("switch", TokenType::Switch),
            ("type", TokenType::Type),
            ("var", TokenType::Var),
        ];

        for (keyword, token_type) in keywords {
            self.keywords.insert(keyword, token_type);
        }
    }

    /// Get current character
    pub(crate) fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    pub(crate) fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    /// Advance to next character
    pub(crate) fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.position += 1;
        let width = ch.len_utf8() as i64;
        self.offset += width;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += width;
        }
        Some(ch)
    }

    /// Consume the current character if it is `expected`.
    pub(crate) fn follow(&mut self, expected: char) -> bool {
        if self.current_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn current_location(&self) -> SourcePosition {
        SourcePosition::new(&self.filename, self.line, self.offset, self.column)
    }

    pub(crate) fn error_at(&self, message: impl Into<String>, position: SourcePosition) -> BridgeError {
        BridgeError::syntax_error(message, position)
    }

    /// Skip blanks. Newlines are blanks only while no semicolon is pending.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' if !self.insert_semicolon => {
                    self.advance();
                }
                _ => break,
            }
        }
    }

    /// Whether the comment starting here runs past the end of the line.
    fn comment_ends_line(&self) -> bool {
        if self.peek_char(1) == Some('/') {
            return true;
        }
        let mut index = self.position + 2;
        while let Some(&ch) = self.input.get(index) {
            if ch == '\n' {
                return true;
            }
            if ch == '*' && self.input.get(index + 1) == Some(&'/') {
                return false;
            }
            index += 1;
        }
        true
    }

    fn tokenize_identifier(&mut self) -> TokenType {
        let mut identifier = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match self.keywords.get(identifier.as_str()) {
            Some(keyword) => keyword.clone(),
            None => TokenType::Identifier(identifier),
        }
    }

    /// Get next token
    pub fn next_token(&mut self) -> Result<Token, BridgeError> {
        self.skip_whitespace();

        let start_location = self.current_location();

        let ch = match self.current_char() {
            Some(ch) => ch,
            None => {
                if self.insert_semicolon {
                    self.insert_semicolon = false;
                    return Ok(Token::implicit_semicolon(start_location));
                }
                return Ok(Token::eof(start_location));
            }
        };

        if ch == '\n' {
            self.insert_semicolon = false;
            self.advance();
            return Ok(Token::implicit_semicolon(start_location));
        }

        if ch == '/' && matches!(self.peek_char(1), Some('/') | Some('*')) {
            if self.insert_semicolon && self.comment_ends_line() {
                self.insert_semicolon = false;
                return Ok(Token::implicit_semicolon(start_location));
            }
            let token_type = if self.peek_char(1) == Some('/') {
                self.tokenize_line_comment()
            } else {
                self.tokenize_block_comment()?
            };
            let span = SourceSpan::new(start_location, self.current_location());
            return Ok(Token::new(token_type, span));
        }

        let token_type = match ch {
            ch if ch.is_alphabetic() || ch == '_' => self.tokenize_identifier(),
            ch if ch.is_ascii_digit() => self.tokenize_number()?,
            '.' if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => self.tokenize_number()?,
            '\'' => self.tokenize_rune()?,
            '"' => self.tokenize_string()?,
            '`' => self.tokenize_raw_string()?,
            _ => self.tokenize_operator()?,
        };

        self.insert_semicolon = token_type.ends_statement();
        let span = SourceSpan::new(start_location, self.current_location());
        Ok(Token::new(token_type, span))
    }

    /// Tokenize the entire input, comments included
    pub fn tokenize(&mut self) -> Result<Vec<Token>, BridgeError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.token_type, TokenType::EndOfFile);
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }
}
