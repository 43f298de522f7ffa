//! Semantic facts
//!
//! The side tables a type checker produces for a package: resolved types and
//! constant values of expressions, and the object kind each identifier use
//! refers to. Lowering consumes them through [`SemanticFacts`]; it never
//! computes them.

pub mod constants;
pub mod types;

pub use constants::{ConstValue, ExactInt, ExactRational, InvalidExactInt};
pub use types::{BasicKind, NamedType, ObjectKind, SemanticType, Var};

use crate::ast::NodeId;
use std::collections::HashMap;
use std::sync::Arc;

/// A checker-ordered package initialization step: `vars = value`
///
/// `vars` are the node ids of the declaring identifiers and `value` the node
/// id of the initializer expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initializer {
    pub vars: Vec<NodeId>,
    pub value: NodeId,
}

/// Lookup from syntax node identity to checker results
pub trait SemanticFacts: Send + Sync {
    /// Resolved type of an expression
    fn type_of(&self, expr: NodeId) -> Option<&SemanticType>;

    /// Constant value of an expression, if it is a compile-time constant
    fn constant_of(&self, expr: NodeId) -> Option<&ConstValue>;

    /// Object an identifier use refers to
    fn object_of(&self, ident: NodeId) -> Option<ObjectKind>;

    /// Package variable initialization order, when the checker computed one
    fn init_order(&self) -> Option<&[Initializer]> {
        None
    }
}

/// In-memory [`SemanticFacts`]
#[derive(Debug, Clone, Default)]
pub struct FactTable {
    types: HashMap<NodeId, Arc<SemanticType>>,
    constants: HashMap<NodeId, ConstValue>,
    objects: HashMap<NodeId, ObjectKind>,
    init_order: Option<Vec<Initializer>>,
}

impl FactTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, expr: NodeId, ty: Arc<SemanticType>) -> Self {
        self.insert_type(expr, ty);
        self
    }

    pub fn with_constant(mut self, expr: NodeId, ty: Arc<SemanticType>, value: ConstValue) -> Self {
        self.insert_type(expr, ty);
        self.insert_constant(expr, value);
        self
    }

    pub fn with_object(mut self, ident: NodeId, kind: ObjectKind) -> Self {
        self.insert_object(ident, kind);
        self
    }

    pub fn with_init_order(mut self, order: Vec<Initializer>) -> Self {
        self.init_order = Some(order);
        self
    }

    pub fn insert_type(&mut self, expr: NodeId, ty: Arc<SemanticType>) {
        self.types.insert(expr, ty);
    }

    pub fn insert_constant(&mut self, expr: NodeId, value: ConstValue) {
        self.constants.insert(expr, value);
    }

    pub fn insert_object(&mut self, ident: NodeId, kind: ObjectKind) {
        self.objects.insert(ident, kind);
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.constants.is_empty()
            && self.objects.is_empty()
            && self.init_order.is_none()
    }
}

impl SemanticFacts for FactTable {
    fn type_of(&self, expr: NodeId) -> Option<&SemanticType> {
        self.types.get(&expr).map(|ty| ty.as_ref())
    }

    fn constant_of(&self, expr: NodeId) -> Option<&ConstValue> {
        self.constants.get(&expr)
    }

    fn object_of(&self, ident: NodeId) -> Option<ObjectKind> {
        self.objects.get(&ident).copied()
    }

    fn init_order(&self) -> Option<&[Initializer]> {
        self.init_order.as_deref()
    }
}
