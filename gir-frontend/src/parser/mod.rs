//! Go Recursive Descent Parser
//!
//! Parses Go tokens into an Abstract Syntax Tree (AST).
//! Implements a recursive descent parser for the Go grammar without type
//! parameters.

pub mod errors;
pub mod comments;
pub mod types;
pub mod declarations;
pub mod statements;
pub mod expressions;

use crate::ast::*;
use crate::lexer::{Token, TokenType};
use comments::CommentTable;
use gir_common::SourcePosition;

pub use errors::ParseError;

/// Go Parser
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) cursor: usize,
    pub(crate) node_id_gen: NodeIdGenerator,
    /// Nesting depth of parentheses and brackets; `-1` inside control
    /// clause headers, where `T{` opens a block rather than a literal.
    pub(crate) expr_level: i32,
    pub(crate) comments: CommentTable,
    /// Index of the last consumed token that was not an implicit semicolon
    pub(crate) last_real: Option<usize>,
    /// Inside a switch header, where a `.(type)` guard may appear
    pub(crate) in_switch_header: bool,
    /// Number of `.(type)` guards parsed so far
    pub(crate) type_guards: usize,
}

impl Parser {
    /// Create a new parser
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_node_ids(tokens, NodeIdGenerator::new())
    }

    /// Create a parser that continues numbering from `node_id_gen`.
    pub fn with_node_ids(tokens: Vec<Token>, node_id_gen: NodeIdGenerator) -> Self {
        let (mut tokens, comments) = comments::split_comments(tokens);
        if !matches!(tokens.last().map(|t| &t.token_type), Some(TokenType::EndOfFile)) {
            let position = tokens
                .last()
                .map(|t| t.span.end.clone())
                .unwrap_or_else(SourcePosition::unspecified);
            tokens.push(Token::eof(position));
        }

        Self {
            tokens,
            cursor: 0,
            node_id_gen,
            expr_level: 0,
            comments,
            last_real: None,
            in_switch_header: false,
            type_guards: 0,
        }
    }

    /// Hand back the id generator so the next file can continue from it.
    pub fn into_node_ids(self) -> NodeIdGenerator {
        self.node_id_gen
    }

    /// Peek at current token without consuming
    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.cursor.min(last)]
    }

    pub(crate) fn peek_type(&self) -> &TokenType {
        &self.peek().token_type
    }

    /// Peek `n` tokens past the current one
    pub(crate) fn peek_nth(&self, n: usize) -> &TokenType {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.cursor + n).min(last)].token_type
    }

    /// Get current token and advance; the end-of-file token is sticky.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.cursor < self.tokens.len() - 1 {
            if !token.is_implicit() {
                self.last_real = Some(self.cursor);
            }
            self.cursor += 1;
        }
        token
    }

    /// Check if current token matches expected type
    pub(crate) fn check(&self, token_type: &TokenType) -> bool {
        std::mem::discriminant(self.peek_type()) == std::mem::discriminant(token_type)
    }

    pub(crate) fn check_identifier(&self) -> bool {
        matches!(self.peek_type(), TokenType::Identifier(_))
    }

    /// Consume token if it matches expected type
    pub(crate) fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let found = self.peek().clone();
        if matches!(found.token_type, TokenType::EndOfFile) {
            ParseError::UnexpectedEndOfFile {
                expected: expected.into(),
                position: found.span.start,
            }
        } else {
            ParseError::UnexpectedToken {
                expected: expected.into(),
                found,
            }
        }
    }

    /// Expect and consume a specific token type
    pub(crate) fn expect(&mut self, token_type: TokenType, context: &str) -> Result<Token, ParseError> {
        if self.check(&token_type) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(format!("'{}' in {}", token_type, context)))
        }
    }

    /// A statement terminator; optional before a closing `)` or `}`.
    pub(crate) fn expect_semicolon(&mut self, context: &str) -> Result<(), ParseError> {
        match self.peek_type() {
            TokenType::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenType::RightParen | TokenType::RightBrace => Ok(()),
            _ => Err(self.unexpected(format!("';' or newline after {}", context))),
        }
    }

    /// Get current location for error reporting
    pub(crate) fn current_location(&self) -> SourcePosition {
        self.peek().span.start.clone()
    }

    pub(crate) fn make_expr(&mut self, kind: ExprKind, position: SourcePosition) -> Expr {
        Expr::new(self.node_id_gen.next(), kind, position)
    }

    pub(crate) fn expect_ident(&mut self, context: &str) -> Result<Ident, ParseError> {
        match self.peek_type().clone() {
            TokenType::Identifier(name) => {
                let token = self.advance();
                Ok(Ident {
                    node_id: self.node_id_gen.next(),
                    name,
                    position: token.span.start,
                })
            }
            _ => Err(self.unexpected(format!("identifier in {}", context))),
        }
    }

    /// Lead comment of the current token
    pub(crate) fn lead_comment(&self) -> Option<CommentGroup> {
        self.comments.lead_comment(self.cursor)
    }

    /// Line comment trailing the most recently consumed token
    pub(crate) fn line_comment(&self) -> Option<CommentGroup> {
        self.last_real
            .and_then(|index| self.comments.line_comment(index))
    }

    /// Parse a single expression that must account for all input.
    pub fn parse_standalone_expression(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if self.peek().is_implicit() {
            self.advance();
        }
        if !self.check(&TokenType::EndOfFile) {
            return Err(self.unexpected("end of expression"));
        }
        Ok(expr)
    }
}
