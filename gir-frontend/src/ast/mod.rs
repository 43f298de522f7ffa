//! Abstract Syntax Tree definitions for Go
//!
//! This module defines the syntax nodes produced by the parser and consumed
//! by the lowering engine. Every expression and identifier carries a
//! [`NodeId`]; semantic facts are keyed by it.

pub mod ops;
pub mod expressions;
pub mod statements;
pub mod declarations;

// Re-export commonly used types at module level
pub use ops::{AssignOp, BinaryOp, BranchKind, IncDecOp, UnaryOp};
pub use expressions::{
    BasicLit, ChanDir, Expr, ExprKind, Field, FieldList, FuncType, Ident, LitKind,
};
pub use statements::{Block, Stmt, StmtKind};
pub use declarations::{
    Comment, CommentGroup, Decl, DeclKeyword, File, FuncDecl, GenDecl, ImportSpec, Spec,
    TypeSpec, ValueSpec,
};

/// Unique identifier for AST nodes, the key into semantic facts
pub type NodeId = u32;

/// Node ID generator for AST nodes
///
/// One generator is shared by all files of a package so ids stay unique
/// within the package.
#[derive(Debug, Clone, Default)]
pub struct NodeIdGenerator {
    next_id: NodeId,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    pub fn next(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The id the next call to [`NodeIdGenerator::next`] will hand out.
    pub fn peek(&self) -> NodeId {
        self.next_id
    }
}
