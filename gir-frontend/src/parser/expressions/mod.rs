//! Expression parsing for Go
//!
//! This module handles parsing of all expression types using precedence
//! climbing over Go's five binary precedence levels.

mod primary;
mod postfix;
mod unary;
mod binary;

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};

impl Parser {
    /// Parse expression (top level)
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_expression(1)
    }

    /// Parse `a, b, c`
    pub fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut list = vec![self.parse_expression()?];
        while self.match_token(&TokenType::Comma) {
            list.push(self.parse_expression()?);
        }
        Ok(list)
    }
}
