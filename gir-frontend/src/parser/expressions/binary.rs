//! Binary expression parsing with operator precedence

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};

fn binary_operator(token_type: &TokenType) -> Option<BinaryOp> {
    let op = match token_type {
        TokenType::PipePipe => BinaryOp::LogicalOr,
        TokenType::AmpersandAmpersand => BinaryOp::LogicalAnd,
        TokenType::EqualEqual => BinaryOp::Equal,
        TokenType::BangEqual => BinaryOp::NotEqual,
        TokenType::Less => BinaryOp::Less,
        TokenType::LessEqual => BinaryOp::LessEqual,
        TokenType::Greater => BinaryOp::Greater,
        TokenType::GreaterEqual => BinaryOp::GreaterEqual,
        TokenType::Plus => BinaryOp::Add,
        TokenType::Minus => BinaryOp::Sub,
        TokenType::Pipe => BinaryOp::Or,
        TokenType::Caret => BinaryOp::Xor,
        TokenType::Star => BinaryOp::Mul,
        TokenType::Slash => BinaryOp::Quo,
        TokenType::Percent => BinaryOp::Rem,
        TokenType::LeftShift => BinaryOp::Shl,
        TokenType::RightShift => BinaryOp::Shr,
        TokenType::Ampersand => BinaryOp::And,
        TokenType::AndNot => BinaryOp::AndNot,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    /// Parse binary operators binding at least as tightly as `min_precedence`
    pub fn parse_binary_expression(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let op = match binary_operator(self.peek_type()) {
                Some(op) if op.precedence() >= min_precedence => op,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_binary_expression(op.precedence() + 1)?;
            let position = left.position.clone();

            left = self.make_expr(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                position,
            );
        }
    }
}
