//! Statement lowering

use crate::context::LowerContext;
use crate::ir::{Node, Statement};
use gir_common::BridgeError;
use gir_frontend::ast::{AssignOp, Block, BranchKind, Stmt, StmtKind};

impl LowerContext<'_> {
    /// Lower the statements of a block, in order
    pub fn block(&self, block: &Block) -> Result<Vec<Node>, BridgeError> {
        self.stmts(&block.statements)
    }

    pub(crate) fn stmts(&self, stmts: &[Stmt]) -> Result<Vec<Node>, BridgeError> {
        stmts.iter().map(|stmt| self.lower_stmt(stmt)).collect()
    }

    fn boxed_stmt(&self, stmt: &Stmt) -> Result<Box<Node>, BridgeError> {
        self.lower_stmt(stmt).map(Box::new)
    }

    fn optional_stmt(&self, stmt: Option<&Stmt>) -> Result<Option<Box<Node>>, BridgeError> {
        stmt.map(|s| self.boxed_stmt(s)).transpose()
    }

    pub fn lower_stmt(&self, stmt: &Stmt) -> Result<Node, BridgeError> {
        let position = stmt.position.clone();
        let statement = match &stmt.kind {
            StmtKind::Bad => {
                return Err(BridgeError::internal_error("encountered BadStmt", position));
            }
            StmtKind::Decl(decl) => Statement::Declaration {
                target: Box::new(self.lower_gen_decl(decl)?),
            },
            StmtKind::Empty => Statement::Empty,
            StmtKind::Labeled { label, statement } => Statement::Labeled {
                label: self.ident(label),
                statement: self.boxed_stmt(statement)?,
            },
            StmtKind::Expr(expr) => Statement::Expression {
                value: self.boxed_expr(expr)?,
            },
            StmtKind::Send { channel, value } => Statement::Send {
                channel: self.boxed_expr(channel)?,
                value: self.boxed_expr(value)?,
            },
            StmtKind::IncDec { target, op } => Statement::Crement {
                target: self.boxed_expr(target)?,
                operation: op.to_string(),
            },
            StmtKind::Assign { left, op, right } => {
                let (left, right) = (self.exprs(left)?, self.exprs(right)?);
                match op {
                    AssignOp::Assign => Statement::Assign { left, right },
                    AssignOp::Define => Statement::Define { left, right },
                    AssignOp::Compound(op) => Statement::AssignOperator {
                        operator: op.to_string(),
                        left,
                        right,
                    },
                }
            }
            StmtKind::Go(call) => Statement::Go {
                target: self.boxed_expr(call)?,
            },
            StmtKind::Defer(call) => Statement::Defer {
                target: self.boxed_expr(call)?,
            },
            StmtKind::Return(values) => Statement::Return {
                values: self.exprs(values)?,
            },
            StmtKind::Branch { kind, label } => {
                let label = label.as_ref().map(|l| self.ident(l));
                match kind {
                    BranchKind::Break => Statement::Break { label },
                    BranchKind::Continue => Statement::Continue { label },
                    BranchKind::Goto => Statement::Goto { label },
                    BranchKind::Fallthrough => Statement::Fallthrough,
                }
            }
            StmtKind::Block(block) => Statement::Block {
                body: self.block(block)?,
            },
            StmtKind::If {
                init,
                condition,
                body,
                else_branch,
            } => Statement::If {
                init: self.optional_stmt(init.as_deref())?,
                condition: self.boxed_expr(condition)?,
                body: self.block(body)?,
                else_branch: self.optional_stmt(else_branch.as_deref())?,
            },
            StmtKind::CaseClause { expressions, body } => Statement::CaseClause {
                expressions: self.exprs(expressions)?,
                body: self.stmts(body)?,
            },
            StmtKind::Switch { init, tag, body } => Statement::Switch {
                init: self.optional_stmt(init.as_deref())?,
                condition: self.optional_expr(tag.as_ref())?,
                body: self.block(body)?,
            },
            StmtKind::TypeSwitch { init, assign, body } => Statement::TypeSwitch {
                init: self.optional_stmt(init.as_deref())?,
                assign: self.boxed_stmt(assign)?,
                body: self.block(body)?,
            },
            StmtKind::CommClause { comm, body } => Statement::SelectClause {
                statement: self.optional_stmt(comm.as_deref())?,
                body: self.stmts(body)?,
            },
            StmtKind::Select { body } => Statement::Select {
                body: self.block(body)?,
            },
            StmtKind::For {
                init,
                condition,
                post,
                body,
            } => Statement::For {
                init: self.optional_stmt(init.as_deref())?,
                condition: self.optional_expr(condition.as_ref())?,
                post: self.optional_stmt(post.as_deref())?,
                body: self.block(body)?,
            },
            // `is-assign` marks the `:=` form.
            StmtKind::Range {
                key,
                value,
                define,
                target,
                body,
            } => Statement::Range {
                key: self.optional_expr(key.as_ref())?,
                value: self.optional_expr(value.as_ref())?,
                target: self.boxed_expr(target)?,
                is_assign: *define,
                body: self.block(body)?,
            },
        };
        Ok(Node::statement(statement, position))
    }
}

#[cfg(test)]
mod tests {
    use crate::context::LowerContext;
    use gir_frontend::ast::{Decl, File};
    use gir_frontend::Frontend;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn body_of(file: &File) -> Vec<Value> {
        match &file.decls[0] {
            Decl::Func(func) => {
                let body = func.body.as_ref().unwrap();
                let nodes = LowerContext::syntactic().block(body).unwrap();
                nodes.iter().map(|n| serde_json::to_value(n).unwrap()).collect()
            }
            _ => panic!("Expected function declaration"),
        }
    }

    fn lower_stmts(source: &str) -> Vec<Value> {
        body_of(&Frontend::parse_statements(source).unwrap())
    }

    #[test]
    fn test_assignment_forms() {
        let stmts = lower_stmts("x := 1; x = 2; x += 3; x <<= 1; x++; x--");
        let tags: Vec<_> = stmts.iter().map(|s| s["type"].clone()).collect();
        assert_eq!(
            tags,
            vec![
                json!("define"),
                json!("assign"),
                json!("assign-operator"),
                json!("assign-operator"),
                json!("crement"),
                json!("crement"),
            ]
        );
        assert_eq!(stmts[2]["operator"], "+");
        assert_eq!(stmts[3]["operator"], "<<");
        assert_eq!(stmts[4]["operation"], "++");
        assert_eq!(stmts[5]["operation"], "--");
        assert!(stmts.iter().all(|s| s["kind"] == "statement"));
    }

    #[test]
    fn test_if_else_chain() {
        let stmts = lower_stmts(indoc! {"
            if v, ok := m[k]; ok {
                return v
            } else if foo > 0 {
                return \"a\"
            } else {
                return \"b\"
            }
        "});
        let outer = &stmts[0];
        assert_eq!(outer["type"], "if");
        assert_eq!(outer["init"]["type"], "define");
        assert_eq!(outer["else"]["type"], "if");
        assert_eq!(outer["else"]["else"]["type"], "block");
        assert!(outer["else"]["init"].is_null());
    }

    #[test]
    fn test_loops_and_range() {
        let stmts = lower_stmts(indoc! {"
            for i := 0; i < 10; i++ {
                continue
            }
            for {
                break
            }
            for k, v := range m {
            }
            for range ch {
            }
        "});
        assert_eq!(stmts[0]["type"], "for");
        assert_eq!(stmts[0]["post"]["type"], "crement");
        assert_eq!(stmts[0]["body"][0]["type"], "continue");
        assert!(stmts[0]["body"][0]["label"].is_null());
        assert!(stmts[1]["condition"].is_null());
        assert_eq!(stmts[2]["type"], "range");
        assert_eq!(stmts[2]["is-assign"], true);
        assert_eq!(stmts[2]["key"]["value"]["value"], "k");
        assert!(stmts[3]["key"].is_null());
        assert_eq!(stmts[3]["is-assign"], false);
    }

    #[test]
    fn test_switch_forms() {
        let stmts = lower_stmts(indoc! {"
            switch x := f(); x {
            case 1, 2:
                fallthrough
            default:
            }
            switch t := v.(type) {
            case int:
            }
        "});
        assert_eq!(stmts[0]["type"], "switch");
        assert_eq!(stmts[0]["condition"]["type"], "identifier");
        let clauses = stmts[0]["body"].as_array().unwrap();
        assert_eq!(clauses[0]["type"], "case-clause");
        assert_eq!(clauses[0]["expressions"].as_array().unwrap().len(), 2);
        assert_eq!(clauses[0]["body"][0]["type"], "fallthrough");
        assert_eq!(clauses[1]["expressions"], json!([]));

        assert_eq!(stmts[1]["type"], "type-switch");
        assert_eq!(stmts[1]["assign"]["type"], "define");
        assert_eq!(stmts[1]["assign"]["right"][0]["type"], "type-assert");
        assert!(stmts[1]["assign"]["right"][0]["asserted"].is_null());
    }

    #[test]
    fn test_select_and_channel_statements() {
        let stmts = lower_stmts(indoc! {"
            select {
            case v := <-in:
                out <- v
            default:
            }
            go work()
            defer done()
        "});
        let clauses = stmts[0]["body"].as_array().unwrap();
        assert_eq!(clauses[0]["type"], "select-clause");
        assert_eq!(clauses[0]["statement"]["type"], "define");
        assert_eq!(clauses[0]["body"][0]["type"], "send");
        assert!(clauses[1]["statement"].is_null());
        assert_eq!(stmts[1]["type"], "go");
        assert_eq!(stmts[1]["target"]["type"], "call");
        assert_eq!(stmts[2]["type"], "defer");
    }

    #[test]
    fn test_labels_and_local_declarations() {
        let stmts = lower_stmts(indoc! {"
            const limit = 3
            outer:
            for {
                break outer
            }
            goto outer
        "});
        assert_eq!(stmts[0]["type"], "declaration");
        assert_eq!(stmts[0]["target"]["kind"], "decl");
        assert_eq!(stmts[0]["target"]["type"], "const");
        assert_eq!(stmts[1]["type"], "labeled");
        assert_eq!(stmts[1]["label"]["value"], "outer");
        assert_eq!(stmts[1]["statement"]["body"][0]["label"]["value"], "outer");
        assert_eq!(stmts[2]["type"], "goto");
    }

    #[test]
    fn test_return_values_use_wrapper_parameters() {
        let stmts = lower_stmts("return foo + bar");
        assert_eq!(stmts[0]["type"], "return");
        let sum = &stmts[0]["values"][0];
        assert_eq!(sum["type"], "binary");
        assert_eq!(sum["left"]["value"]["value"], "foo");
        assert_eq!(sum["right"]["value"]["value"], "bar");
    }
}
