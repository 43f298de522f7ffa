//! Primary expression (operand) parsing

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};

impl Parser {
    /// Parse an operand: identifier, literal, parenthesized expression,
    /// function literal or composite type
    pub fn parse_operand(&mut self) -> Result<Expr, ParseError> {
        let position = self.current_location();

        let literal = match self.peek_type() {
            TokenType::IntLiteral(text) => Some((LitKind::Int, text.clone())),
            TokenType::FloatLiteral(text) => Some((LitKind::Float, text.clone())),
            TokenType::ImagLiteral(text) => Some((LitKind::Imag, text.clone())),
            TokenType::CharLiteral(text) => Some((LitKind::Char, text.clone())),
            TokenType::StringLiteral(text) => Some((LitKind::String, text.clone())),
            _ => None,
        };
        if let Some((kind, value)) = literal {
            self.advance();
            let lit = BasicLit {
                kind,
                value,
                position: position.clone(),
            };
            return Ok(self.make_expr(ExprKind::BasicLit(lit), position));
        }

        match self.peek_type() {
            TokenType::Identifier(_) => {
                let ident = self.expect_ident("operand")?;
                Ok(Expr::ident(ident))
            }

            TokenType::LeftParen => {
                self.advance();
                self.expr_level += 1;
                let inner = self.parse_expression()?;
                self.expr_level -= 1;
                self.expect(TokenType::RightParen, "parenthesized expression")?;
                Ok(self.make_expr(ExprKind::Paren(Box::new(inner)), position))
            }

            TokenType::Func => {
                self.advance();
                let ty = self.parse_signature(position.clone())?;
                if self.check(&TokenType::LeftBrace) {
                    self.expr_level += 1;
                    let body = self.parse_block()?;
                    self.expr_level -= 1;
                    Ok(self.make_expr(ExprKind::FuncLit { ty, body }, position))
                } else {
                    Ok(self.make_expr(ExprKind::FuncType(ty), position))
                }
            }

            TokenType::LeftBracket
            | TokenType::Struct
            | TokenType::Map
            | TokenType::Chan
            | TokenType::Interface => self.parse_type(),

            _ => Err(self.unexpected("operand")),
        }
    }
}
