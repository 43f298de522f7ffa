//! Per-invocation lowering context
//!
//! Holds the (optional) semantic facts for the package being lowered. A
//! context is a plain value handed to every lowering call, so independent
//! lowerings can run side by side.

use crate::descriptor::render_type;
use crate::ir::TypeDescriptor;
use gir_common::BridgeError;
use gir_frontend::ast::NodeId;
use gir_frontend::{ConstValue, ObjectKind, SemanticFacts, SemanticType};

#[derive(Clone, Copy, Default)]
pub struct LowerContext<'a> {
    facts: Option<&'a dyn SemanticFacts>,
}

impl<'a> LowerContext<'a> {
    /// Lower from syntax alone
    pub fn syntactic() -> Self {
        Self { facts: None }
    }

    pub fn with_facts(facts: &'a dyn SemanticFacts) -> Self {
        Self { facts: Some(facts) }
    }

    pub fn new(facts: Option<&'a dyn SemanticFacts>) -> Self {
        Self { facts }
    }

    pub fn has_facts(&self) -> bool {
        self.facts.is_some()
    }

    pub fn semantic_type(&self, node: NodeId) -> Option<&'a SemanticType> {
        self.facts.and_then(|facts| facts.type_of(node))
    }

    /// The `go-type` descriptor of a node, if facts know its type
    pub fn go_type(&self, node: NodeId) -> Result<Option<TypeDescriptor>, BridgeError> {
        self.semantic_type(node).map(render_type).transpose()
    }

    /// Constant value and type of a node; both must be known.
    pub fn constant(&self, node: NodeId) -> Option<(&'a ConstValue, &'a SemanticType)> {
        let facts = self.facts?;
        let value = facts.constant_of(node)?;
        let ty = facts.type_of(node)?;
        Some((value, ty))
    }

    pub fn object_kind(&self, ident: NodeId) -> Option<ObjectKind> {
        self.facts.and_then(|facts| facts.object_of(ident))
    }
}

impl std::fmt::Debug for LowerContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LowerContext")
            .field("has_facts", &self.has_facts())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gir_frontend::{BasicKind, FactTable};

    #[test]
    fn test_syntactic_context_knows_nothing() {
        let ctx = LowerContext::syntactic();
        assert!(!ctx.has_facts());
        assert!(ctx.go_type(0).unwrap().is_none());
        assert!(ctx.constant(0).is_none());
        assert!(ctx.object_kind(0).is_none());
    }

    #[test]
    fn test_constant_requires_type() {
        let mut facts = FactTable::new();
        facts.insert_constant(1, ConstValue::Bool(true));
        let facts = facts.with_constant(2, SemanticType::basic(BasicKind::UntypedBool), ConstValue::Bool(true));
        let ctx = LowerContext::with_facts(&facts);
        assert!(ctx.constant(1).is_none());
        assert!(ctx.constant(2).is_some());
        assert_eq!(
            ctx.go_type(2).unwrap(),
            Some(TypeDescriptor::Basic {
                kind: BasicKind::UntypedBool
            })
        );
    }
}
