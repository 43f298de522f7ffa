//! Postfix expression parsing: selectors, index and slice expressions,
//! type assertions, calls and composite literals

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};

/// Whether `T{` after this expression can open a composite literal, and if
/// so whether that depends on being outside a control clause header.
fn literal_type_needs_expr_level(expr: &Expr) -> Option<bool> {
    match &expr.unparen().kind {
        ExprKind::Bad | ExprKind::Ident(_) | ExprKind::Selector { .. } => Some(true),
        ExprKind::ArrayType { .. } | ExprKind::StructType { .. } | ExprKind::MapType { .. } => {
            Some(false)
        }
        _ => None,
    }
}

impl Parser {
    /// Parse postfix expressions
    pub fn parse_primary_expression(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_operand()?;

        loop {
            match self.peek_type() {
                TokenType::Dot => {
                    self.advance();
                    expr = self.parse_selector_or_assertion(expr)?;
                }
                TokenType::LeftBracket => {
                    expr = self.parse_index_or_slice(expr)?;
                }
                TokenType::LeftParen => {
                    expr = self.parse_call(expr)?;
                }
                TokenType::LeftBrace => {
                    let is_literal = match literal_type_needs_expr_level(&expr) {
                        Some(true) => self.expr_level >= 0,
                        Some(false) => true,
                        None => false,
                    };
                    if !is_literal {
                        break;
                    }
                    expr = self.parse_literal_value(Some(expr))?;
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_selector_or_assertion(&mut self, target: Expr) -> Result<Expr, ParseError> {
        let position = target.position.clone();
        match self.peek_type() {
            TokenType::Identifier(_) => {
                let selector = self.expect_ident("selector")?;
                Ok(self.make_expr(
                    ExprKind::Selector {
                        target: Box::new(target),
                        selector,
                    },
                    position,
                ))
            }
            TokenType::LeftParen => {
                self.advance();
                let asserted = if self.check(&TokenType::Type) {
                    let keyword = self.advance();
                    if !self.in_switch_header || self.expr_level >= 0 {
                        return Err(ParseError::InvalidExpression {
                            message: "use of .(type) outside type switch".to_string(),
                            position: keyword.span.start,
                        });
                    }
                    self.type_guards += 1;
                    None
                } else {
                    Some(Box::new(self.parse_type()?))
                };
                self.expect(TokenType::RightParen, "type assertion")?;
                Ok(self.make_expr(
                    ExprKind::TypeAssert {
                        target: Box::new(target),
                        asserted,
                    },
                    position,
                ))
            }
            _ => Err(self.unexpected("selector or type assertion")),
        }
    }

    fn parse_index_or_slice(&mut self, target: Expr) -> Result<Expr, ParseError> {
        let position = target.position.clone();
        self.advance();
        self.expr_level += 1;

        let mut index: [Option<Box<Expr>>; 3] = [None, None, None];
        let mut colons = 0;
        if !self.check(&TokenType::Colon) {
            index[0] = Some(Box::new(self.parse_expression()?));
        }
        while self.check(&TokenType::Colon) && colons < 2 {
            self.advance();
            colons += 1;
            if !self.check(&TokenType::Colon) && !self.check(&TokenType::RightBracket) {
                index[colons] = Some(Box::new(self.parse_expression()?));
            }
        }

        self.expr_level -= 1;
        let close = self.expect(TokenType::RightBracket, "index expression")?;

        let [low, high, max] = index;
        if colons == 0 {
            let index = match low {
                Some(index) => index,
                None => {
                    return Err(ParseError::InvalidExpression {
                        message: "expected operand in index expression".to_string(),
                        position: close.span.start,
                    })
                }
            };
            return Ok(self.make_expr(
                ExprKind::Index {
                    target: Box::new(target),
                    index,
                },
                position,
            ));
        }

        let three = colons == 2;
        if three && (high.is_none() || max.is_none()) {
            return Err(ParseError::InvalidExpression {
                message: "middle and final index required in 3-index slice".to_string(),
                position: close.span.start,
            });
        }
        Ok(self.make_expr(
            ExprKind::Slice {
                target: Box::new(target),
                low,
                high,
                max,
                three,
            },
            position,
        ))
    }

    fn parse_call(&mut self, function: Expr) -> Result<Expr, ParseError> {
        let position = function.position.clone();
        self.advance();
        self.expr_level += 1;

        let mut arguments = Vec::new();
        let mut ellipsis = false;
        while !self.check(&TokenType::RightParen) && !self.check(&TokenType::EndOfFile) {
            arguments.push(self.parse_expression()?);
            if self.match_token(&TokenType::Ellipsis) {
                ellipsis = true;
            }
            if !self.match_token(&TokenType::Comma) {
                break;
            }
        }

        self.expr_level -= 1;
        self.expect(TokenType::RightParen, "argument list")?;

        Ok(self.make_expr(
            ExprKind::Call {
                function: Box::new(function),
                arguments,
                ellipsis,
            },
            position,
        ))
    }

    /// Parse `{ elements }` of a composite literal
    pub(crate) fn parse_literal_value(&mut self, ty: Option<Expr>) -> Result<Expr, ParseError> {
        let lbrace = self.expect(TokenType::LeftBrace, "composite literal")?;
        let position = ty
            .as_ref()
            .map(|t| t.position.clone())
            .unwrap_or_else(|| lbrace.span.start.clone());
        self.expr_level += 1;

        let mut elements = Vec::new();
        while !self.check(&TokenType::RightBrace) && !self.check(&TokenType::EndOfFile) {
            elements.push(self.parse_element()?);
            if !self.match_token(&TokenType::Comma) {
                break;
            }
        }

        self.expr_level -= 1;
        self.expect(TokenType::RightBrace, "composite literal")?;

        Ok(self.make_expr(
            ExprKind::CompositeLit {
                ty: ty.map(Box::new),
                elements,
            },
            position,
        ))
    }

    fn parse_element(&mut self) -> Result<Expr, ParseError> {
        let key = self.parse_element_value()?;
        if self.match_token(&TokenType::Colon) {
            let value = self.parse_element_value()?;
            let position = key.position.clone();
            return Ok(self.make_expr(
                ExprKind::KeyValue {
                    key: Box::new(key),
                    value: Box::new(value),
                },
                position,
            ));
        }
        Ok(key)
    }

    fn parse_element_value(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenType::LeftBrace) {
            self.parse_literal_value(None)
        } else {
            self.parse_expression()
        }
    }
}
