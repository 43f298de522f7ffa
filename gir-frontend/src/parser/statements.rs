//! Statement parsing for Go

use crate::ast::*;
use crate::lexer::TokenType;
use crate::parser::{ParseError, Parser};
use gir_common::SourcePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SimpleMode {
    Basic,
    LabelOk,
    RangeOk,
}

/// Result of a simple statement; a range clause only appears in `for` headers.
enum Simple {
    Stmt(Stmt),
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        target: Expr,
        position: SourcePosition,
    },
}

fn compound_operator(token_type: &TokenType) -> Option<AssignOp> {
    let op = match token_type {
        TokenType::Equal => AssignOp::Assign,
        TokenType::ColonEqual => AssignOp::Define,
        TokenType::PlusEqual => AssignOp::Compound(BinaryOp::Add),
        TokenType::MinusEqual => AssignOp::Compound(BinaryOp::Sub),
        TokenType::StarEqual => AssignOp::Compound(BinaryOp::Mul),
        TokenType::SlashEqual => AssignOp::Compound(BinaryOp::Quo),
        TokenType::PercentEqual => AssignOp::Compound(BinaryOp::Rem),
        TokenType::AmpersandEqual => AssignOp::Compound(BinaryOp::And),
        TokenType::PipeEqual => AssignOp::Compound(BinaryOp::Or),
        TokenType::CaretEqual => AssignOp::Compound(BinaryOp::Xor),
        TokenType::LeftShiftEqual => AssignOp::Compound(BinaryOp::Shl),
        TokenType::RightShiftEqual => AssignOp::Compound(BinaryOp::Shr),
        TokenType::AndNotEqual => AssignOp::Compound(BinaryOp::AndNot),
        _ => return None,
    };
    Some(op)
}

fn is_type_switch_guard(stmt: &Stmt) -> bool {
    let is_guard = |expr: &Expr| matches!(expr.kind, ExprKind::TypeAssert { asserted: None, .. });
    match &stmt.kind {
        StmtKind::Expr(expr) => is_guard(expr),
        StmtKind::Assign {
            left,
            op: AssignOp::Define,
            right,
        } => left.len() == 1 && right.len() == 1 && is_guard(&right[0]),
        _ => false,
    }
}

fn into_condition(stmt: Stmt, context: &str) -> Result<Expr, ParseError> {
    match stmt.kind {
        StmtKind::Expr(expr) => Ok(expr),
        _ => Err(ParseError::InvalidStatement {
            message: format!("expected {} condition, found {}", context, stmt.shape_name()),
            position: stmt.position,
        }),
    }
}

impl Parser {
    /// Parse a block statement
    pub fn parse_block(&mut self) -> Result<Block, ParseError> {
        let lbrace = self.expect(TokenType::LeftBrace, "block")?;
        let in_switch_header = std::mem::replace(&mut self.in_switch_header, false);
        let statements = self.parse_statement_list();
        self.in_switch_header = in_switch_header;
        let statements = statements?;
        self.expect(TokenType::RightBrace, "block")?;
        Ok(Block {
            statements,
            position: lbrace.span.start,
        })
    }

    pub(crate) fn parse_statement_list(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !matches!(
            self.peek_type(),
            TokenType::Case | TokenType::Default | TokenType::RightBrace | TokenType::EndOfFile
        ) {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// Parse a statement, including its terminating semicolon
    pub fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let position = self.current_location();

        let stmt = match self.peek_type() {
            TokenType::Const | TokenType::Type | TokenType::Var => {
                let keyword = match self.peek_type() {
                    TokenType::Const => DeclKeyword::Const,
                    TokenType::Type => DeclKeyword::Type,
                    _ => DeclKeyword::Var,
                };
                let decl = self.parse_gen_decl(keyword)?;
                return Ok(Stmt::new(StmtKind::Decl(decl), position));
            }

            TokenType::Identifier(_)
            | TokenType::IntLiteral(_)
            | TokenType::FloatLiteral(_)
            | TokenType::ImagLiteral(_)
            | TokenType::CharLiteral(_)
            | TokenType::StringLiteral(_)
            | TokenType::Func
            | TokenType::LeftParen
            | TokenType::LeftBracket
            | TokenType::Struct
            | TokenType::Map
            | TokenType::Chan
            | TokenType::Interface
            | TokenType::Plus
            | TokenType::Minus
            | TokenType::Star
            | TokenType::Ampersand
            | TokenType::Caret
            | TokenType::Bang
            | TokenType::Arrow => {
                let stmt = self.parse_simple(SimpleMode::LabelOk)?;
                if matches!(stmt.kind, StmtKind::Labeled { .. }) {
                    return Ok(stmt);
                }
                stmt
            }

            TokenType::Go | TokenType::Defer => {
                let is_go = matches!(self.peek_type(), TokenType::Go);
                let keyword = if is_go { "go" } else { "defer" };
                self.advance();
                let call = self.parse_expression()?;
                if !matches!(call.unparen().kind, ExprKind::Call { .. }) {
                    return Err(ParseError::InvalidStatement {
                        message: format!("expression in {} must be function call", keyword),
                        position: call.position,
                    });
                }
                let kind = if is_go {
                    StmtKind::Go(call)
                } else {
                    StmtKind::Defer(call)
                };
                Stmt::new(kind, position)
            }

            TokenType::Return => {
                self.advance();
                let values = if self.check(&TokenType::Semicolon) || self.check(&TokenType::RightBrace) {
                    Vec::new()
                } else {
                    self.parse_expression_list()?
                };
                Stmt::new(StmtKind::Return(values), position)
            }

            TokenType::Break | TokenType::Continue | TokenType::Goto | TokenType::Fallthrough => {
                let kind = match self.advance().token_type {
                    TokenType::Break => BranchKind::Break,
                    TokenType::Continue => BranchKind::Continue,
                    TokenType::Goto => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                };
                let label = if kind != BranchKind::Fallthrough && self.check_identifier() {
                    Some(self.expect_ident("branch label")?)
                } else {
                    None
                };
                Stmt::new(StmtKind::Branch { kind, label }, position)
            }

            TokenType::LeftBrace => {
                let block = self.parse_block()?;
                Stmt::new(StmtKind::Block(block), position)
            }

            TokenType::If => self.parse_if_statement()?,
            TokenType::Switch => self.parse_switch_statement()?,
            TokenType::Select => self.parse_select_statement()?,
            TokenType::For => self.parse_for_statement()?,

            TokenType::Semicolon => {
                self.advance();
                return Ok(Stmt::new(StmtKind::Empty, position));
            }

            // A semicolon may be omitted before a closing brace
            TokenType::RightBrace => return Ok(Stmt::new(StmtKind::Empty, position)),

            _ => return Err(self.unexpected("statement")),
        };

        self.expect_semicolon("statement")?;
        Ok(stmt)
    }

    fn parse_simple(&mut self, mode: SimpleMode) -> Result<Stmt, ParseError> {
        match self.parse_simple_statement(mode)? {
            Simple::Stmt(stmt) => Ok(stmt),
            Simple::Range { position, .. } => Err(ParseError::InvalidStatement {
                message: "range clause outside of a for statement".to_string(),
                position,
            }),
        }
    }

    fn parse_simple_statement(&mut self, mode: SimpleMode) -> Result<Simple, ParseError> {
        let position = self.current_location();
        let left = self.parse_expression_list()?;

        if let Some(op) = compound_operator(self.peek_type()) {
            self.advance();
            let plain = matches!(op, AssignOp::Assign | AssignOp::Define);
            if mode == SimpleMode::RangeOk && plain && self.check(&TokenType::Range) {
                self.advance();
                let target = self.parse_expression()?;
                if left.len() > 2 {
                    return Err(ParseError::InvalidStatement {
                        message: "range clause permits at most two iteration variables"
                            .to_string(),
                        position,
                    });
                }
                let mut vars = left.into_iter();
                return Ok(Simple::Range {
                    key: vars.next(),
                    value: vars.next(),
                    define: op == AssignOp::Define,
                    target,
                    position,
                });
            }
            let right = self.parse_expression_list()?;
            return Ok(Simple::Stmt(Stmt::new(
                StmtKind::Assign { left, op, right },
                position,
            )));
        }

        if left.len() > 1 {
            return Err(self.unexpected("':=', '=' or an assignment operator"));
        }
        let expr = match left.into_iter().next() {
            Some(expr) => expr,
            None => return Err(self.unexpected("expression")),
        };

        let kind = match self.peek_type() {
            TokenType::Colon if mode == SimpleMode::LabelOk && expr.as_ident().is_some() => {
                self.advance();
                let label = match expr.kind {
                    ExprKind::Ident(ident) => ident,
                    _ => return Err(self.unexpected("label")),
                };
                let statement = Box::new(self.parse_statement()?);
                StmtKind::Labeled { label, statement }
            }
            TokenType::Arrow => {
                self.advance();
                let value = self.parse_expression()?;
                StmtKind::Send {
                    channel: expr,
                    value,
                }
            }
            TokenType::PlusPlus => {
                self.advance();
                StmtKind::IncDec {
                    target: expr,
                    op: IncDecOp::Increment,
                }
            }
            TokenType::MinusMinus => {
                self.advance();
                StmtKind::IncDec {
                    target: expr,
                    op: IncDecOp::Decrement,
                }
            }
            _ => StmtKind::Expr(expr),
        };

        Ok(Simple::Stmt(Stmt::new(kind, position)))
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        let position = self.advance().span.start;
        if self.check(&TokenType::LeftBrace) {
            return Err(ParseError::InvalidStatement {
                message: "missing condition in if statement".to_string(),
                position: self.current_location(),
            });
        }

        let saved_level = self.expr_level;
        self.expr_level = -1;

        let mut init = None;
        let first = if self.check(&TokenType::Semicolon) {
            None
        } else {
            Some(self.parse_simple(SimpleMode::Basic)?)
        };
        let condition = if self.check(&TokenType::Semicolon) {
            self.advance();
            init = first.map(Box::new);
            if self.check(&TokenType::LeftBrace) {
                return Err(ParseError::InvalidStatement {
                    message: "missing condition in if statement".to_string(),
                    position: self.current_location(),
                });
            }
            self.parse_simple(SimpleMode::Basic)?
        } else {
            match first {
                Some(stmt) => stmt,
                None => return Err(self.unexpected("if condition")),
            }
        };
        let condition = into_condition(condition, "if")?;

        self.expr_level = saved_level;
        let body = self.parse_block()?;

        let else_branch = if self.match_token(&TokenType::Else) {
            match self.peek_type() {
                TokenType::If => Some(Box::new(self.parse_if_statement()?)),
                TokenType::LeftBrace => {
                    let block_position = self.current_location();
                    let block = self.parse_block()?;
                    Some(Box::new(Stmt::new(StmtKind::Block(block), block_position)))
                }
                _ => return Err(self.unexpected("if statement or block after else")),
            }
        } else {
            None
        };

        Ok(Stmt::new(
            StmtKind::If {
                init,
                condition,
                body,
                else_branch,
            },
            position,
        ))
    }

    /// Optional init statement and tag of a switch header
    fn parse_switch_header(&mut self) -> Result<(Option<Box<Stmt>>, Option<Stmt>), ParseError> {
        let mut init = None;
        let mut tag = None;
        if !self.check(&TokenType::Semicolon) {
            tag = Some(self.parse_simple(SimpleMode::Basic)?);
        }
        if self.check(&TokenType::Semicolon) {
            self.advance();
            init = tag.take().map(Box::new);
            if !self.check(&TokenType::LeftBrace) {
                tag = Some(self.parse_simple(SimpleMode::Basic)?);
            }
        }
        Ok((init, tag))
    }

    fn parse_switch_statement(&mut self) -> Result<Stmt, ParseError> {
        let position = self.advance().span.start;

        let mut init = None;
        let mut tag = None;
        let guards_before = self.type_guards;
        if !self.check(&TokenType::LeftBrace) {
            let saved_level = self.expr_level;
            let saved_header = std::mem::replace(&mut self.in_switch_header, true);
            self.expr_level = -1;
            let header = self.parse_switch_header();
            self.expr_level = saved_level;
            self.in_switch_header = saved_header;
            (init, tag) = header?;
        }

        let type_switch = tag.as_ref().is_some_and(is_type_switch_guard);
        let guards = self.type_guards - guards_before;
        if guards > usize::from(type_switch) {
            return Err(ParseError::InvalidStatement {
                message: "use of .(type) outside type switch".to_string(),
                position,
            });
        }

        let lbrace = self.expect(TokenType::LeftBrace, "switch statement")?;
        let mut clauses = Vec::new();
        while self.check(&TokenType::Case) || self.check(&TokenType::Default) {
            clauses.push(self.parse_case_clause()?);
        }
        self.expect(TokenType::RightBrace, "switch statement")?;
        let body = Block {
            statements: clauses,
            position: lbrace.span.start,
        };

        let kind = match tag {
            Some(assign) if type_switch => StmtKind::TypeSwitch {
                init,
                assign: Box::new(assign),
                body,
            },
            tag => StmtKind::Switch {
                init,
                tag: tag.map(|stmt| into_condition(stmt, "switch")).transpose()?,
                body,
            },
        };
        Ok(Stmt::new(kind, position))
    }

    fn parse_case_clause(&mut self) -> Result<Stmt, ParseError> {
        let position = self.current_location();
        let expressions = if self.match_token(&TokenType::Case) {
            self.parse_expression_list()?
        } else {
            self.expect(TokenType::Default, "switch clause")?;
            Vec::new()
        };
        self.expect(TokenType::Colon, "case clause")?;
        let body = self.parse_statement_list()?;
        Ok(Stmt::new(StmtKind::CaseClause { expressions, body }, position))
    }

    fn parse_select_statement(&mut self) -> Result<Stmt, ParseError> {
        let position = self.advance().span.start;
        let lbrace = self.expect(TokenType::LeftBrace, "select statement")?;
        let mut clauses = Vec::new();
        while self.check(&TokenType::Case) || self.check(&TokenType::Default) {
            clauses.push(self.parse_comm_clause()?);
        }
        self.expect(TokenType::RightBrace, "select statement")?;
        let body = Block {
            statements: clauses,
            position: lbrace.span.start,
        };
        Ok(Stmt::new(StmtKind::Select { body }, position))
    }

    fn parse_comm_clause(&mut self) -> Result<Stmt, ParseError> {
        let position = self.current_location();
        let comm = if self.match_token(&TokenType::Case) {
            let comm_position = self.current_location();
            let mut left = self.parse_expression_list()?;
            let kind = if self.check(&TokenType::Arrow) {
                if left.len() > 1 {
                    return Err(self.unexpected("one expression before '<-'"));
                }
                self.advance();
                let value = self.parse_expression()?;
                StmtKind::Send {
                    channel: left.remove(0),
                    value,
                }
            } else if let Some(op @ (AssignOp::Assign | AssignOp::Define)) =
                compound_operator(self.peek_type())
            {
                if left.len() > 2 {
                    return Err(ParseError::InvalidStatement {
                        message: "receive assignment permits at most two variables".to_string(),
                        position: comm_position,
                    });
                }
                self.advance();
                let right = vec![self.parse_expression()?];
                StmtKind::Assign { left, op, right }
            } else {
                if left.len() > 1 {
                    return Err(self.unexpected("':=', '=' or '<-'"));
                }
                StmtKind::Expr(left.remove(0))
            };
            Some(Box::new(Stmt::new(kind, comm_position)))
        } else {
            self.expect(TokenType::Default, "select clause")?;
            None
        };
        self.expect(TokenType::Colon, "select clause")?;
        let body = self.parse_statement_list()?;
        Ok(Stmt::new(StmtKind::CommClause { comm, body }, position))
    }

    fn parse_for_statement(&mut self) -> Result<Stmt, ParseError> {
        let position = self.advance().span.start;

        let saved_level = self.expr_level;
        self.expr_level = -1;

        let mut init = None;
        let mut condition = None;
        let mut post = None;
        let mut range = None;

        if self.check(&TokenType::Range) {
            let range_position = self.advance().span.start;
            let target = self.parse_expression()?;
            range = Some((None, None, false, target, range_position));
        } else if !self.check(&TokenType::LeftBrace) {
            let mut header = None;
            if !self.check(&TokenType::Semicolon) {
                header = Some(self.parse_simple_statement(SimpleMode::RangeOk)?);
            }
            match header {
                Some(Simple::Range {
                    key,
                    value,
                    define,
                    target,
                    position,
                }) => range = Some((key, value, define, target, position)),
                Some(Simple::Stmt(stmt)) if !self.check(&TokenType::Semicolon) => {
                    condition = Some(into_condition(stmt, "for loop")?);
                }
                first => {
                    self.expect(TokenType::Semicolon, "for clause")?;
                    init = match first {
                        Some(Simple::Stmt(stmt)) => Some(Box::new(stmt)),
                        _ => None,
                    };
                    if !self.check(&TokenType::Semicolon) {
                        let stmt = self.parse_simple(SimpleMode::Basic)?;
                        condition = Some(into_condition(stmt, "for loop")?);
                    }
                    self.expect(TokenType::Semicolon, "for clause")?;
                    if !self.check(&TokenType::LeftBrace) {
                        post = Some(Box::new(self.parse_simple(SimpleMode::Basic)?));
                    }
                }
            }
        }

        self.expr_level = saved_level;
        let body = self.parse_block()?;

        let kind = match range {
            Some((key, value, define, target, _)) => StmtKind::Range {
                key,
                value,
                define,
                target,
                body,
            },
            None => StmtKind::For {
                init,
                condition,
                post,
                body,
            },
        };
        Ok(Stmt::new(kind, position))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parse_body(body: &str) -> Vec<Stmt> {
        let source = format!("{{\n{}\n}}", body);
        let tokens = Lexer::new(&source, "s.go").tokenize().unwrap();
        Parser::new(tokens).parse_block().unwrap().statements
    }

    fn parse_one(body: &str) -> Stmt {
        let mut statements = parse_body(body);
        assert_eq!(statements.len(), 1, "expected one statement in {body:?}");
        statements.remove(0)
    }

    #[test]
    fn test_assignment_forms() {
        match parse_one("x, y := 1, 2").kind {
            StmtKind::Assign { left, op: AssignOp::Define, right } => {
                assert_eq!(left.len(), 2);
                assert_eq!(right.len(), 2);
            }
            _ => panic!("Expected define"),
        }
        assert!(matches!(
            parse_one("x <<= 2").kind,
            StmtKind::Assign { op: AssignOp::Compound(BinaryOp::Shl), .. }
        ));
        assert!(matches!(
            parse_one("i++").kind,
            StmtKind::IncDec { op: IncDecOp::Increment, .. }
        ));
        assert!(matches!(parse_one("ch <- v").kind, StmtKind::Send { .. }));
    }

    #[test]
    fn test_if_else_chain() {
        match parse_one("if x := f(); x > 0 {\n} else if y {\n} else {\n}").kind {
            StmtKind::If { init, else_branch, .. } => {
                assert!(init.is_some());
                match else_branch.unwrap().kind {
                    StmtKind::If { else_branch, .. } => {
                        assert!(matches!(else_branch.unwrap().kind, StmtKind::Block(_)))
                    }
                    _ => panic!("Expected else-if"),
                }
            }
            _ => panic!("Expected if statement"),
        }
    }

    #[test]
    fn test_composite_literal_not_allowed_in_header() {
        // `T {` opens the body, so the condition is just `x == T`
        match parse_one("if x == T {\n}").kind {
            StmtKind::If { condition, body, .. } => {
                assert!(matches!(condition.kind, ExprKind::Binary { .. }));
                assert!(body.statements.is_empty());
            }
            _ => panic!("Expected if statement"),
        }
        // parenthesized literals are fine
        assert!(matches!(parse_one("if x == (T{}) {\n}").kind, StmtKind::If { .. }));
    }

    #[test]
    fn test_for_forms() {
        assert!(matches!(
            parse_one("for {\n}").kind,
            StmtKind::For { init: None, condition: None, post: None, .. }
        ));
        assert!(matches!(
            parse_one("for i < n {\n}").kind,
            StmtKind::For { condition: Some(_), init: None, .. }
        ));
        match parse_one("for i := 0; i < 10; i++ {\n}").kind {
            StmtKind::For { init, condition, post, .. } => {
                assert!(init.is_some() && condition.is_some() && post.is_some())
            }
            _ => panic!("Expected three-clause for"),
        }
        match parse_one("for k, v := range m {\n}").kind {
            StmtKind::Range { key, value, define, .. } => {
                assert!(key.is_some() && value.is_some() && define)
            }
            _ => panic!("Expected range"),
        }
        assert!(matches!(
            parse_one("for range ch {\n}").kind,
            StmtKind::Range { key: None, value: None, define: false, .. }
        ));
    }

    #[test]
    fn test_switch_and_type_switch() {
        match parse_one("switch x {\ncase 1, 2:\n\tf()\ndefault:\n}").kind {
            StmtKind::Switch { tag, body, .. } => {
                assert!(tag.is_some());
                assert_eq!(body.statements.len(), 2);
            }
            _ => panic!("Expected switch"),
        }
        assert!(matches!(
            parse_one("switch v := x.(type) {\ncase int:\n}").kind,
            StmtKind::TypeSwitch { .. }
        ));
    }

    #[test]
    fn test_type_guard_only_in_switch_header() {
        let parse = |body: &str| {
            let source = format!("{{\n{}\n}}", body);
            let tokens = Lexer::new(&source, "s.go").tokenize().unwrap();
            Parser::new(tokens).parse_block()
        };
        assert!(parse("switch init(); x.(type) {\n}").is_ok());
        assert!(parse("switch x.(type) {\ncase int:\n\tswitch y.(type) {\n\t}\n}").is_ok());
        for body in [
            "v := x.(type)",
            "switch x.(type); y {\n}",
            "switch f(x.(type)) {\n}",
            "switch x.(type) == y.(type) {\n}",
            "switch f := func() { _ = x.(type) }; f {\n}",
        ] {
            let err = parse(body).unwrap_err();
            assert!(err.to_string().contains("use of .(type) outside type switch"), "{body}");
        }
    }

    #[test]
    fn test_select() {
        match parse_one("select {\ncase v := <-ch:\n\t_ = v\ncase out <- 1:\ndefault:\n}").kind {
            StmtKind::Select { body } => {
                assert_eq!(body.statements.len(), 3);
                match &body.statements[2].kind {
                    StmtKind::CommClause { comm, .. } => assert!(comm.is_none()),
                    _ => panic!("Expected default clause"),
                }
            }
            _ => panic!("Expected select"),
        }
    }

    #[test]
    fn test_labels_and_branches() {
        match parse_one("outer:\n\tfor {\n\t\tbreak outer\n\t}").kind {
            StmtKind::Labeled { label, statement } => {
                assert_eq!(label.name, "outer");
                assert!(matches!(statement.kind, StmtKind::For { .. }));
            }
            _ => panic!("Expected labeled statement"),
        }
    }

    #[test]
    fn test_go_requires_call() {
        let tokens = Lexer::new("{ go x }", "s.go").tokenize().unwrap();
        assert!(Parser::new(tokens).parse_block().is_err());
    }
}
