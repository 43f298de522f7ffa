//! Declaration and source file parsing for Go

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};
use log::trace;

impl Parser {
    /// Parse a complete source file
    pub fn parse_file(&mut self) -> Result<File, ParseError> {
        let doc = self.lead_comment();
        let package_token = self.expect(TokenType::Package, "package clause")?;
        let name = self.expect_ident("package clause")?;
        self.expect_semicolon("package clause")?;
        trace!("parsing package {} in {}", name.name, package_token.span.start.filename);

        let mut decls = Vec::new();
        while self.check(&TokenType::Import) {
            decls.push(Decl::Gen(self.parse_gen_decl(DeclKeyword::Import)?));
        }

        while !self.check(&TokenType::EndOfFile) {
            let decl = match self.peek_type() {
                TokenType::Const => Decl::Gen(self.parse_gen_decl(DeclKeyword::Const)?),
                TokenType::Var => Decl::Gen(self.parse_gen_decl(DeclKeyword::Var)?),
                TokenType::Type => Decl::Gen(self.parse_gen_decl(DeclKeyword::Type)?),
                TokenType::Func => Decl::Func(self.parse_func_decl()?),
                TokenType::Import => {
                    return Err(ParseError::InvalidStatement {
                        message: "imports must appear before other declarations".to_string(),
                        position: self.current_location(),
                    })
                }
                _ => return Err(self.unexpected("declaration")),
            };
            decls.push(decl);
        }

        Ok(File {
            filename: package_token.span.start.filename.clone(),
            doc,
            package_position: package_token.span.start,
            name,
            decls,
            comments: self.comments.groups.clone(),
        })
    }

    /// Parse `import`, `const`, `type` or `var`, grouped or single
    pub fn parse_gen_decl(&mut self, keyword: DeclKeyword) -> Result<GenDecl, ParseError> {
        let doc = self.lead_comment();
        let position = self.advance().span.start;

        let mut specs = Vec::new();
        if self.match_token(&TokenType::LeftParen) {
            while !self.check(&TokenType::RightParen) && !self.check(&TokenType::EndOfFile) {
                let spec_doc = self.lead_comment();
                specs.push(self.parse_spec(keyword, spec_doc)?);
            }
            self.expect(TokenType::RightParen, "declaration group")?;
            self.expect_semicolon("declaration")?;
        } else {
            specs.push(self.parse_spec(keyword, None)?);
        }

        Ok(GenDecl {
            doc,
            keyword,
            specs,
            position,
        })
    }

    fn parse_spec(&mut self, keyword: DeclKeyword, doc: Option<CommentGroup>) -> Result<Spec, ParseError> {
        match keyword {
            DeclKeyword::Import => Ok(Spec::Import(self.parse_import_spec(doc)?)),
            DeclKeyword::Type => Ok(Spec::Type(self.parse_type_spec(doc)?)),
            DeclKeyword::Const | DeclKeyword::Var => {
                Ok(Spec::Value(self.parse_value_spec(keyword, doc)?))
            }
        }
    }

    fn parse_import_spec(&mut self, doc: Option<CommentGroup>) -> Result<ImportSpec, ParseError> {
        let position = self.current_location();

        let name = match self.peek_type() {
            TokenType::Identifier(_) => Some(self.expect_ident("import spec")?),
            TokenType::Dot => {
                let dot = self.advance();
                Some(Ident {
                    node_id: self.node_id_gen.next(),
                    name: ".".to_string(),
                    position: dot.span.start,
                })
            }
            _ => None,
        };

        let path = match self.peek_type().clone() {
            TokenType::StringLiteral(value) => {
                let token = self.advance();
                BasicLit {
                    kind: LitKind::String,
                    value,
                    position: token.span.start,
                }
            }
            _ => return Err(self.unexpected("import path")),
        };

        self.expect_semicolon("import spec")?;
        let comment = self.line_comment();

        Ok(ImportSpec {
            doc,
            name,
            path,
            comment,
            position,
        })
    }

    fn parse_value_spec(
        &mut self,
        keyword: DeclKeyword,
        doc: Option<CommentGroup>,
    ) -> Result<ValueSpec, ParseError> {
        let position = self.current_location();

        let mut names = vec![self.expect_ident("declaration")?];
        while self.match_token(&TokenType::Comma) {
            names.push(self.expect_ident("declaration")?);
        }

        let ty = if matches!(
            self.peek_type(),
            TokenType::Equal | TokenType::Semicolon | TokenType::RightParen
        ) {
            None
        } else {
            Some(self.parse_type()?)
        };

        let values = if self.match_token(&TokenType::Equal) {
            self.parse_expression_list()?
        } else {
            Vec::new()
        };

        if keyword == DeclKeyword::Var && ty.is_none() && values.is_empty() {
            return Err(ParseError::InvalidStatement {
                message: "missing variable type or initialization".to_string(),
                position,
            });
        }

        self.expect_semicolon("declaration")?;
        let comment = self.line_comment();

        Ok(ValueSpec {
            doc,
            names,
            ty,
            values,
            comment,
            position,
        })
    }

    fn parse_type_spec(&mut self, doc: Option<CommentGroup>) -> Result<TypeSpec, ParseError> {
        let position = self.current_location();
        let name = self.expect_ident("type declaration")?;
        let alias = self.match_token(&TokenType::Equal);
        let ty = self.parse_type()?;

        self.expect_semicolon("type declaration")?;
        let comment = self.line_comment();

        Ok(TypeSpec {
            doc,
            name,
            alias,
            ty,
            comment,
            position,
        })
    }

    fn parse_func_decl(&mut self) -> Result<FuncDecl, ParseError> {
        let doc = self.lead_comment();
        let position = self.advance().span.start;

        let receiver = if self.check(&TokenType::LeftParen) {
            Some(self.parse_parameters()?)
        } else {
            None
        };
        let name = self.expect_ident("function declaration")?;
        let ty = self.parse_signature(position.clone())?;

        let body = if self.check(&TokenType::LeftBrace) {
            Some(self.parse_block()?)
        } else {
            None
        };
        self.expect_semicolon("function declaration")?;

        Ok(FuncDecl {
            doc,
            receiver,
            name,
            ty,
            body,
            position,
        })
    }
}
