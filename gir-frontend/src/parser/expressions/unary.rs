//! Unary expression parsing

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};

impl Parser {
    /// Parse unary expression
    pub fn parse_unary_expression(&mut self) -> Result<Expr, ParseError> {
        let position = self.current_location();

        let op = match self.peek_type() {
            TokenType::Plus => Some(UnaryOp::Plus),
            TokenType::Minus => Some(UnaryOp::Minus),
            TokenType::Bang => Some(UnaryOp::Not),
            TokenType::Caret => Some(UnaryOp::Complement),
            TokenType::Ampersand => Some(UnaryOp::AddressOf),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary_expression()?;
            return Ok(self.make_expr(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                position,
            ));
        }

        match self.peek_type() {
            TokenType::Arrow => {
                self.advance();
                let operand = self.parse_unary_expression()?;
                // `<-chan T` is a receive-only channel type, not a receive
                let kind = match operand.kind {
                    ExprKind::ChanType {
                        direction: ChanDir::Both,
                        value,
                    } => ExprKind::ChanType {
                        direction: ChanDir::Recv,
                        value,
                    },
                    kind => ExprKind::Unary {
                        op: UnaryOp::Receive,
                        operand: Box::new(Expr { kind, ..operand }),
                    },
                };
                Ok(self.make_expr(kind, position))
            }
            TokenType::Star => {
                self.advance();
                let operand = self.parse_unary_expression()?;
                Ok(self.make_expr(ExprKind::Star(Box::new(operand)), position))
            }
            _ => self.parse_primary_expression(),
        }
    }
}
