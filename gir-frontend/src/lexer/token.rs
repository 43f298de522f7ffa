//! Token definitions for the Go lexer
//!
//! This module defines token types and the Token struct.

use gir_common::{SourcePosition, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Go token types
///
/// Literal variants keep the raw source text, including quotes, prefixes,
/// digit separators and the imaginary suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenType {
    // Literals
    IntLiteral(String),
    FloatLiteral(String),
    ImagLiteral(String),
    CharLiteral(String),
    StringLiteral(String),

    Identifier(String),

    // Keywords
    Break, Case, Chan, Const, Continue, Default, Defer, Else,
    Fallthrough, For, Func, Go, Goto, If, Import, Interface,
    Map, Package, Range, Return, Select, Struct, Switch, Type, Var,

    // Operators
    Plus,           // +
    Minus,          // -
    Star,           // *
    Slash,          // /
    Percent,        // %
    Ampersand,      // &
    Pipe,           // |
    Caret,          // ^
    LeftShift,      // <<
    RightShift,     // >>
    AndNot,         // &^

    PlusEqual,      // +=
    MinusEqual,     // -=
    StarEqual,      // *=
    SlashEqual,     // /=
    PercentEqual,   // %=
    AmpersandEqual, // &=
    PipeEqual,      // |=
    CaretEqual,     // ^=
    LeftShiftEqual, // <<=
    RightShiftEqual, // >>=
    AndNotEqual,    // &^=

    AmpersandAmpersand, // &&
    PipePipe,       // ||
    Arrow,          // <-
    PlusPlus,       // ++
    MinusMinus,     // --

    EqualEqual,     // ==
    Less,           // <
    Greater,        // >
    Equal,          // =
    Bang,           // !
    BangEqual,      // !=
    LessEqual,      // <=
    GreaterEqual,   // >=
    ColonEqual,     // :=
    Ellipsis,       // ...

    // Delimiters
    LeftParen,      // (
    RightParen,     // )
    LeftBracket,    // [
    RightBracket,   // ]
    LeftBrace,      // {
    RightBrace,     // }
    Comma,          // ,
    Dot,            // .
    Semicolon,      // ; (explicit or inserted at a line end)
    Colon,          // :

    /// `//...` or `/*...*/`, raw text including the delimiters
    Comment(String),

    EndOfFile,
}

impl TokenType {
    /// Whether a newline directly after this token ends the statement.
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenType::Identifier(_)
                | TokenType::IntLiteral(_)
                | TokenType::FloatLiteral(_)
                | TokenType::ImagLiteral(_)
                | TokenType::CharLiteral(_)
                | TokenType::StringLiteral(_)
                | TokenType::Break
                | TokenType::Continue
                | TokenType::Fallthrough
                | TokenType::Return
                | TokenType::PlusPlus
                | TokenType::MinusMinus
                | TokenType::RightParen
                | TokenType::RightBracket
                | TokenType::RightBrace
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenType::IntLiteral(_)
                | TokenType::FloatLiteral(_)
                | TokenType::ImagLiteral(_)
                | TokenType::CharLiteral(_)
                | TokenType::StringLiteral(_)
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenType::IntLiteral(s)
            | TokenType::FloatLiteral(s)
            | TokenType::ImagLiteral(s)
            | TokenType::CharLiteral(s)
            | TokenType::StringLiteral(s)
            | TokenType::Identifier(s)
            | TokenType::Comment(s) => return write!(f, "{s}"),

            TokenType::Break => "break",
            TokenType::Case => "case",
            TokenType::Chan => "chan",
            TokenType::Const => "const",
            TokenType::Continue => "continue",
            TokenType::Default => "default",
            TokenType::Defer => "defer",
            TokenType::Else => "else",
            TokenType::Fallthrough => "fallthrough",
            TokenType::For => "for",
            TokenType::Func => "func",
            TokenType::Go => "go",
            TokenType::Goto => "goto",
            TokenType::If => "if",
            TokenType::Import => "import",
            TokenType::Interface => "interface",
            TokenType::Map => "map",
            TokenType::Package => "package",
            TokenType::Range => "range",
            TokenType::Return => "return",
            TokenType::Select => "select",
            TokenType::Struct => "struct",
            TokenType::Switch => "switch",
            TokenType::Type => "type",
            TokenType::Var => "var",

            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Star => "*",
            TokenType::Slash => "/",
            TokenType::Percent => "%",
            TokenType::Ampersand => "&",
            TokenType::Pipe => "|",
            TokenType::Caret => "^",
            TokenType::LeftShift => "<<",
            TokenType::RightShift => ">>",
            TokenType::AndNot => "&^",
            TokenType::PlusEqual => "+=",
            TokenType::MinusEqual => "-=",
            TokenType::StarEqual => "*=",
            TokenType::SlashEqual => "/=",
            TokenType::PercentEqual => "%=",
            TokenType::AmpersandEqual => "&=",
            TokenType::PipeEqual => "|=",
            TokenType::CaretEqual => "^=",
            TokenType::LeftShiftEqual => "<<=",
            TokenType::RightShiftEqual => ">>=",
            TokenType::AndNotEqual => "&^=",
            TokenType::AmpersandAmpersand => "&&",
            TokenType::PipePipe => "||",
            TokenType::Arrow => "<-",
            TokenType::PlusPlus => "++",
            TokenType::MinusMinus => "--",
            TokenType::EqualEqual => "==",
            TokenType::Less => "<",
            TokenType::Greater => ">",
            TokenType::Equal => "=",
            TokenType::Bang => "!",
            TokenType::BangEqual => "!=",
            TokenType::LessEqual => "<=",
            TokenType::GreaterEqual => ">=",
            TokenType::ColonEqual => ":=",
            TokenType::Ellipsis => "...",

            TokenType::LeftParen => "(",
            TokenType::RightParen => ")",
            TokenType::LeftBracket => "[",
            TokenType::RightBracket => "]",
            TokenType::LeftBrace => "{",
            TokenType::RightBrace => "}",
            TokenType::Comma => ",",
            TokenType::Dot => ".",
            TokenType::Semicolon => ";",
            TokenType::Colon => ":",

            TokenType::EndOfFile => "EOF",
        };
        write!(f, "{text}")
    }
}

/// A token with location information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: TokenType,
    pub span: SourceSpan,
}

impl Token {
    pub fn new(token_type: TokenType, span: SourceSpan) -> Self {
        Self { token_type, span }
    }

    pub fn eof(position: SourcePosition) -> Self {
        Self {
            token_type: TokenType::EndOfFile,
            span: SourceSpan::empty_at(position),
        }
    }

    /// A semicolon inserted by the lexer at a line end or at end of input.
    pub fn implicit_semicolon(position: SourcePosition) -> Self {
        Self {
            token_type: TokenType::Semicolon,
            span: SourceSpan::empty_at(position),
        }
    }

    pub fn is_implicit(&self) -> bool {
        matches!(self.token_type, TokenType::Semicolon) && self.span.is_empty()
    }

    pub fn position(&self) -> &SourcePosition {
        &self.span.start
    }

    /// How the token reads in an error message.
    pub fn describe(&self) -> String {
        match &self.token_type {
            TokenType::Semicolon if self.is_implicit() => "newline".to_string(),
            TokenType::EndOfFile => "EOF".to_string(),
            TokenType::Identifier(name) => format!("identifier {name}"),
            TokenType::IntLiteral(s)
            | TokenType::FloatLiteral(s)
            | TokenType::ImagLiteral(s)
            | TokenType::CharLiteral(s)
            | TokenType::StringLiteral(s) => format!("literal {s}"),
            other => format!("'{other}'"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.token_type, self.span.start)
    }
}
