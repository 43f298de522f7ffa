//! Node Lowering Engine
//!
//! Maps syntax nodes to IR nodes, one for one. The work is split by syntax
//! category; every method hangs off [`LowerContext`], which carries the
//! optional semantic facts through the whole recursion.

pub mod heuristics;
mod declarations;
mod expressions;
mod fields;
mod statements;
mod types;

pub use types::TypeMode;

use crate::context::LowerContext;
use crate::ir::{IdentNode, Node};
use gir_common::BridgeError;
use gir_frontend::ast::{CommentGroup, Expr, Ident};

impl LowerContext<'_> {
    /// Name record for an identifier; the kind comes from the facts' uses.
    pub fn ident(&self, ident: &Ident) -> IdentNode {
        IdentNode {
            ident_kind: self.object_kind(ident.node_id),
            value: ident.name.clone(),
            position: ident.position.clone(),
        }
    }

    pub(crate) fn idents(&self, idents: &[Ident]) -> Vec<IdentNode> {
        idents.iter().map(|ident| self.ident(ident)).collect()
    }

    pub(crate) fn boxed_expr(&self, expr: &Expr) -> Result<Box<Node>, BridgeError> {
        self.lower_expr(expr).map(Box::new)
    }

    pub(crate) fn optional_expr(&self, expr: Option<&Expr>) -> Result<Option<Box<Node>>, BridgeError> {
        expr.map(|e| self.boxed_expr(e)).transpose()
    }

    pub(crate) fn exprs(&self, exprs: &[Expr]) -> Result<Vec<Node>, BridgeError> {
        exprs.iter().map(|e| self.lower_expr(e)).collect()
    }
}

/// Raw texts of a comment group; empty when there is none
pub(crate) fn comment_texts(group: Option<&CommentGroup>) -> Vec<String> {
    group.map(CommentGroup::texts).unwrap_or_default()
}
