//! Type syntax parsing for Go
//!
//! Covers type names, composite types, function signatures and parameter
//! lists.

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};
use gir_common::SourcePosition;

/// One parsed parameter entry before names and types are paired up.
struct ParamEntry {
    name: Option<Ident>,
    ty: Option<Expr>,
    position: SourcePosition,
}

impl Parser {
    /// Whether the current token can begin a type
    pub(crate) fn at_type_start(&self) -> bool {
        matches!(
            self.peek_type(),
            TokenType::Identifier(_)
                | TokenType::LeftBracket
                | TokenType::Struct
                | TokenType::Star
                | TokenType::Func
                | TokenType::Interface
                | TokenType::Map
                | TokenType::Chan
                | TokenType::LeftParen
                | TokenType::Arrow
        )
    }

    /// Parse a type
    pub fn parse_type(&mut self) -> Result<Expr, ParseError> {
        let position = self.current_location();

        match self.peek_type() {
            TokenType::Identifier(_) => self.parse_type_name(),

            TokenType::LeftBracket => {
                self.advance();
                let length = if self.check(&TokenType::RightBracket) {
                    None
                } else if self.check(&TokenType::Ellipsis)
                    && matches!(self.peek_nth(1), TokenType::RightBracket)
                {
                    let dots = self.advance();
                    Some(Box::new(
                        self.make_expr(ExprKind::Ellipsis(None), dots.span.start),
                    ))
                } else {
                    self.expr_level += 1;
                    let length = self.parse_expression()?;
                    self.expr_level -= 1;
                    Some(Box::new(length))
                };
                self.expect(TokenType::RightBracket, "array type")?;
                let element = Box::new(self.parse_type()?);
                Ok(self.make_expr(ExprKind::ArrayType { length, element }, position))
            }

            TokenType::Struct => self.parse_struct_type(),

            TokenType::Star => {
                self.advance();
                let pointee = self.parse_type()?;
                Ok(self.make_expr(ExprKind::Star(Box::new(pointee)), position))
            }

            TokenType::Func => {
                self.advance();
                let signature = self.parse_signature(position.clone())?;
                Ok(self.make_expr(ExprKind::FuncType(signature), position))
            }

            TokenType::Interface => self.parse_interface_type(),

            TokenType::Map => {
                self.advance();
                self.expect(TokenType::LeftBracket, "map type")?;
                let key = Box::new(self.parse_type()?);
                self.expect(TokenType::RightBracket, "map type")?;
                let value = Box::new(self.parse_type()?);
                Ok(self.make_expr(ExprKind::MapType { key, value }, position))
            }

            TokenType::Chan => {
                self.advance();
                let direction = if self.match_token(&TokenType::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let value = Box::new(self.parse_type()?);
                Ok(self.make_expr(ExprKind::ChanType { direction, value }, position))
            }

            TokenType::Arrow => {
                self.advance();
                self.expect(TokenType::Chan, "channel type")?;
                let value = Box::new(self.parse_type()?);
                Ok(self.make_expr(
                    ExprKind::ChanType {
                        direction: ChanDir::Recv,
                        value,
                    },
                    position,
                ))
            }

            TokenType::LeftParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(TokenType::RightParen, "parenthesized type")?;
                Ok(self.make_expr(ExprKind::Paren(Box::new(inner)), position))
            }

            _ => Err(self.unexpected("type")),
        }
    }

    /// `T` or `pkg.T`
    pub(crate) fn parse_type_name(&mut self) -> Result<Expr, ParseError> {
        let ident = self.expect_ident("type name")?;
        let position = ident.position.clone();
        let name = Expr::ident(ident);

        if self.check(&TokenType::Dot) && matches!(self.peek_nth(1), TokenType::Identifier(_)) {
            self.advance();
            let selector = self.expect_ident("qualified type name")?;
            return Ok(self.make_expr(
                ExprKind::Selector {
                    target: Box::new(name),
                    selector,
                },
                position,
            ));
        }
        if self.check(&TokenType::LeftBracket) && matches!(self.peek_nth(1), TokenType::Identifier(_)) {
            // T[int] in type position can only be an instantiation
            if matches!(self.peek_nth(2), TokenType::RightBracket | TokenType::Comma) {
                return Err(ParseError::Unsupported {
                    message: "generic type instantiation is not supported".to_string(),
                    position: self.current_location(),
                });
            }
        }
        Ok(name)
    }

    fn parse_struct_type(&mut self) -> Result<Expr, ParseError> {
        let position = self.advance().span.start;
        let lbrace = self.expect(TokenType::LeftBrace, "struct type")?;

        let mut list = Vec::new();
        while !self.check(&TokenType::RightBrace) && !self.check(&TokenType::EndOfFile) {
            list.push(self.parse_field_decl()?);
            self.expect_semicolon("struct field")?;
        }
        self.expect(TokenType::RightBrace, "struct type")?;

        let fields = FieldList {
            list,
            position: lbrace.span.start,
        };
        Ok(self.make_expr(ExprKind::StructType { fields }, position))
    }

    fn parse_field_decl(&mut self) -> Result<Field, ParseError> {
        let position = self.current_location();
        let mut names = Vec::new();

        let ty = match self.peek_type() {
            TokenType::Identifier(_) => match self.peek_nth(1) {
                TokenType::Dot => self.parse_type_name()?,
                TokenType::Semicolon | TokenType::RightBrace | TokenType::StringLiteral(_) => {
                    let ident = self.expect_ident("embedded field")?;
                    Expr::ident(ident)
                }
                _ => {
                    names.push(self.expect_ident("field declaration")?);
                    while self.match_token(&TokenType::Comma) {
                        names.push(self.expect_ident("field declaration")?);
                    }
                    self.parse_type()?
                }
            },
            TokenType::Star => {
                let star = self.advance();
                let name = self.parse_type_name()?;
                self.make_expr(ExprKind::Star(Box::new(name)), star.span.start)
            }
            _ => return Err(self.unexpected("field name or embedded type")),
        };

        let tag = match self.peek_type().clone() {
            TokenType::StringLiteral(value) => {
                let token = self.advance();
                Some(BasicLit {
                    kind: LitKind::String,
                    value,
                    position: token.span.start,
                })
            }
            _ => None,
        };

        Ok(Field {
            names,
            ty,
            tag,
            position,
        })
    }

    fn parse_interface_type(&mut self) -> Result<Expr, ParseError> {
        let position = self.advance().span.start;
        let lbrace = self.expect(TokenType::LeftBrace, "interface type")?;

        let mut list = Vec::new();
        while !self.check(&TokenType::RightBrace) && !self.check(&TokenType::EndOfFile) {
            let field_position = self.current_location();
            if !self.check_identifier() {
                return Err(ParseError::Unsupported {
                    message: format!(
                        "expected method or embedded interface, found {}",
                        self.peek().describe()
                    ),
                    position: field_position,
                });
            }

            let field = if matches!(self.peek_nth(1), TokenType::LeftParen) {
                let name = self.expect_ident("interface method")?;
                let signature = self.parse_signature(field_position.clone())?;
                let ty = self.make_expr(ExprKind::FuncType(signature), field_position.clone());
                Field {
                    names: vec![name],
                    ty,
                    tag: None,
                    position: field_position,
                }
            } else {
                Field {
                    names: Vec::new(),
                    ty: self.parse_type_name()?,
                    tag: None,
                    position: field_position,
                }
            };
            list.push(field);
            self.expect_semicolon("interface method")?;
        }
        self.expect(TokenType::RightBrace, "interface type")?;

        let methods = FieldList {
            list,
            position: lbrace.span.start,
        };
        Ok(self.make_expr(
            ExprKind::InterfaceType {
                methods,
                incomplete: false,
            },
            position,
        ))
    }

    /// Parameters and results following `func` or a method name
    pub(crate) fn parse_signature(&mut self, position: SourcePosition) -> Result<FuncType, ParseError> {
        if self.check(&TokenType::LeftBracket) {
            return Err(ParseError::Unsupported {
                message: "type parameters are not supported".to_string(),
                position: self.current_location(),
            });
        }
        let params = self.parse_parameters()?;
        let results = self.parse_results()?;
        Ok(FuncType {
            params,
            results,
            position,
        })
    }

    fn parse_results(&mut self) -> Result<Option<FieldList>, ParseError> {
        if self.check(&TokenType::LeftParen) {
            return Ok(Some(self.parse_parameters()?));
        }
        if !self.at_type_start() {
            return Ok(None);
        }
        let position = self.current_location();
        let ty = self.parse_type()?;
        Ok(Some(FieldList {
            list: vec![Field {
                names: Vec::new(),
                ty,
                tag: None,
                position: position.clone(),
            }],
            position,
        }))
    }

    fn parse_variadic(&mut self) -> Result<Expr, ParseError> {
        let dots = self.advance();
        let element = self.parse_type()?;
        Ok(self.make_expr(ExprKind::Ellipsis(Some(Box::new(element))), dots.span.start))
    }

    fn parse_param_entry(&mut self) -> Result<ParamEntry, ParseError> {
        let position = self.current_location();

        match self.peek_type() {
            TokenType::Identifier(_) => {
                if matches!(self.peek_nth(1), TokenType::Dot) {
                    let ty = self.parse_type_name()?;
                    return Ok(ParamEntry {
                        name: None,
                        ty: Some(ty),
                        position,
                    });
                }
                let name = self.expect_ident("parameter")?;
                let ty = if self.check(&TokenType::Ellipsis) {
                    Some(self.parse_variadic()?)
                } else if self.at_type_start() {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                Ok(ParamEntry {
                    name: Some(name),
                    ty,
                    position,
                })
            }
            TokenType::Ellipsis => Ok(ParamEntry {
                name: None,
                ty: Some(self.parse_variadic()?),
                position,
            }),
            _ if self.at_type_start() => Ok(ParamEntry {
                name: None,
                ty: Some(self.parse_type()?),
                position,
            }),
            _ => Err(self.unexpected("parameter")),
        }
    }

    /// Parse `(a, b int, c string)` or `(int, string)`
    ///
    /// A lone identifier is a type unless some entry in the list pairs a
    /// name with a type; then every bare identifier is a name that takes
    /// the next type to its right.
    pub(crate) fn parse_parameters(&mut self) -> Result<FieldList, ParseError> {
        let lparen = self.expect(TokenType::LeftParen, "parameter list")?;

        let mut entries = Vec::new();
        while !self.check(&TokenType::RightParen) && !self.check(&TokenType::EndOfFile) {
            entries.push(self.parse_param_entry()?);
            if !self.match_token(&TokenType::Comma) {
                break;
            }
        }
        self.expect(TokenType::RightParen, "parameter list")?;

        let named = entries
            .iter()
            .any(|entry| entry.name.is_some() && entry.ty.is_some());

        let list = if named {
            Self::group_named_params(entries)?
        } else {
            entries
                .into_iter()
                .filter_map(|entry| {
                    let ty = entry.ty.or_else(|| entry.name.map(Expr::ident))?;
                    Some(Field {
                        names: Vec::new(),
                        ty,
                        tag: None,
                        position: entry.position,
                    })
                })
                .collect()
        };

        Ok(FieldList {
            list,
            position: lparen.span.start,
        })
    }

    fn group_named_params(entries: Vec<ParamEntry>) -> Result<Vec<Field>, ParseError> {
        // provider[i] is the index of the entry whose type entry i shares
        let mut provider = vec![0; entries.len()];
        let mut current: Option<usize> = None;
        for (i, entry) in entries.iter().enumerate().rev() {
            if entry.ty.is_some() {
                if entry.name.is_none() {
                    return Err(ParseError::InvalidExpression {
                        message: "mixed named and unnamed parameters".to_string(),
                        position: entry.position.clone(),
                    });
                }
                current = Some(i);
            }
            match current {
                Some(index) => provider[i] = index,
                None => {
                    return Err(ParseError::InvalidExpression {
                        message: "missing parameter type".to_string(),
                        position: entry.position.clone(),
                    })
                }
            }
        }

        let mut fields: Vec<Field> = Vec::new();
        let mut names = Vec::new();
        let mut position: Option<SourcePosition> = None;
        for (i, entry) in entries.into_iter().enumerate() {
            if position.is_none() {
                position = Some(entry.position.clone());
            }
            if let Some(name) = entry.name {
                names.push(name);
            }
            if provider[i] == i {
                if let (Some(ty), Some(position)) = (entry.ty, position.take()) {
                    fields.push(Field {
                        names: std::mem::take(&mut names),
                        ty,
                        tag: None,
                        position,
                    });
                }
            }
        }
        Ok(fields)
    }
}
