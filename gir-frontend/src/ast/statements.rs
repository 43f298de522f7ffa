//! Statement AST nodes for Go

use super::declarations::GenDecl;
use super::expressions::{Expr, Ident};
use super::ops::{AssignOp, BranchKind, IncDecOp};
use gir_common::SourcePosition;
use serde::{Deserialize, Serialize};

/// AST Statement nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    Bad,

    /// `const`, `type` or `var` inside a function body
    Decl(GenDecl),

    Empty,

    Labeled {
        label: Ident,
        statement: Box<Stmt>,
    },

    Expr(Expr),

    Send {
        channel: Expr,
        value: Expr,
    },

    IncDec {
        target: Expr,
        op: IncDecOp,
    },

    Assign {
        left: Vec<Expr>,
        op: AssignOp,
        right: Vec<Expr>,
    },

    Go(Expr),
    Defer(Expr),

    Return(Vec<Expr>),

    Branch {
        kind: BranchKind,
        label: Option<Ident>,
    },

    Block(Block),

    If {
        init: Option<Box<Stmt>>,
        condition: Expr,
        body: Block,
        else_branch: Option<Box<Stmt>>,
    },

    /// `case a, b:` or `default:` (empty expression list)
    CaseClause {
        expressions: Vec<Expr>,
        body: Vec<Stmt>,
    },

    Switch {
        init: Option<Box<Stmt>>,
        tag: Option<Expr>,
        body: Block,
    },

    TypeSwitch {
        init: Option<Box<Stmt>>,
        /// `x := y.(type)` or `y.(type)`
        assign: Box<Stmt>,
        body: Block,
    },

    /// `case <-ch:` in a select; `comm` is absent for `default:`
    CommClause {
        comm: Option<Box<Stmt>>,
        body: Vec<Stmt>,
    },

    Select {
        body: Block,
    },

    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
    },

    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        /// `:=` rather than `=`
        define: bool,
        target: Expr,
        body: Block,
    },
}

impl Stmt {
    pub fn new(kind: StmtKind, position: SourcePosition) -> Self {
        Self { kind, position }
    }

    pub fn shape_name(&self) -> &'static str {
        match &self.kind {
            StmtKind::Bad => "BadStmt",
            StmtKind::Decl(_) => "DeclStmt",
            StmtKind::Empty => "EmptyStmt",
            StmtKind::Labeled { .. } => "LabeledStmt",
            StmtKind::Expr(_) => "ExprStmt",
            StmtKind::Send { .. } => "SendStmt",
            StmtKind::IncDec { .. } => "IncDecStmt",
            StmtKind::Assign { .. } => "AssignStmt",
            StmtKind::Go(_) => "GoStmt",
            StmtKind::Defer(_) => "DeferStmt",
            StmtKind::Return(_) => "ReturnStmt",
            StmtKind::Branch { .. } => "BranchStmt",
            StmtKind::Block(_) => "BlockStmt",
            StmtKind::If { .. } => "IfStmt",
            StmtKind::CaseClause { .. } => "CaseClause",
            StmtKind::Switch { .. } => "SwitchStmt",
            StmtKind::TypeSwitch { .. } => "TypeSwitchStmt",
            StmtKind::CommClause { .. } => "CommClause",
            StmtKind::Select { .. } => "SelectStmt",
            StmtKind::For { .. } => "ForStmt",
            StmtKind::Range { .. } => "RangeStmt",
        }
    }
}

/// `{ ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub position: SourcePosition,
}
