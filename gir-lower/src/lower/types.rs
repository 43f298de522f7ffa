//! Type syntax lowering

use super::heuristics::{ident_may_name_type, selector_names_type};
use crate::context::LowerContext;
use crate::ir::{Expression, Node, NodeBody, TypeNode};
use gir_common::BridgeError;
use gir_frontend::ast::{Expr, ExprKind};

/// What to do with syntax that does not denote a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMode {
    /// Give up quietly; the caller has another reading
    Attempt,
    /// The position requires a type: fail with `unrecognized_type`
    Required,
}

impl LowerContext<'_> {
    /// Lower syntax that must denote a type.
    pub fn lower_type(&self, expr: &Expr) -> Result<Node, BridgeError> {
        self.type_node(expr, TypeMode::Required)?
            .ok_or_else(|| BridgeError::unrecognized_type(expr.shape_name(), expr.position.clone()))
    }

    /// Lower syntax as a type if it reads as one.
    pub fn attempt_type(&self, expr: &Expr) -> Result<Option<Node>, BridgeError> {
        self.type_node(expr, TypeMode::Attempt)
    }

    pub(crate) fn type_node(&self, expr: &Expr, mode: TypeMode) -> Result<Option<Node>, BridgeError> {
        let reject = || -> Result<Option<Node>, BridgeError> {
            match mode {
                TypeMode::Attempt => Ok(None),
                TypeMode::Required => Err(BridgeError::unrecognized_type(
                    expr.shape_name(),
                    expr.position.clone(),
                )),
            }
        };
        macro_rules! component {
            ($e:expr) => {
                match self.type_node($e, mode)? {
                    Some(node) => Box::new(node),
                    None => return Ok(None),
                }
            };
        }

        let ty = match &expr.kind {
            ExprKind::Paren(inner) => return self.type_node(inner, mode),
            ExprKind::Bad => {
                return Err(BridgeError::internal_error(
                    "encountered BadExpr",
                    expr.position.clone(),
                ))
            }
            ExprKind::Ident(ident) => {
                if !ident_may_name_type(self.has_facts(), self.object_kind(ident.node_id)) {
                    return reject();
                }
                TypeNode::Identifier {
                    value: self.ident(ident),
                    qualifier: None,
                }
            }
            ExprKind::Selector { target, selector } => {
                let lhs = self.lower_expr(target)?;
                let selected = self.object_kind(selector.node_id);
                if !selector_names_type(self.has_facts(), selected, &lhs) {
                    return reject();
                }
                let qualifier = match lhs.body {
                    NodeBody::Expression(Expression::Identifier { value, .. }) => value,
                    _ => return reject(),
                };
                TypeNode::Identifier {
                    value: self.ident(selector),
                    qualifier: Some(qualifier),
                }
            }
            ExprKind::ArrayType {
                length: None,
                element,
            } => TypeNode::Slice {
                element: component!(element),
            },
            ExprKind::ArrayType {
                length: Some(length),
                element,
            } => TypeNode::Array {
                element: component!(element),
                length: self.boxed_expr(length)?,
            },
            ExprKind::Star(inner) => TypeNode::Pointer {
                contained: component!(inner),
            },
            ExprKind::InterfaceType {
                methods,
                incomplete,
            } => TypeNode::Interface {
                incomplete: *incomplete,
                methods: self.fields(&methods.list)?,
            },
            ExprKind::MapType { key, value } => TypeNode::Map {
                key: component!(key),
                value: component!(value),
            },
            ExprKind::ChanType { direction, value } => TypeNode::Chan {
                direction: *direction,
                value: component!(value),
            },
            ExprKind::StructType { fields } => TypeNode::Struct {
                fields: self.fields(&fields.list)?,
            },
            ExprKind::FuncType(func) => {
                let signature = self.signature(func)?;
                TypeNode::Function {
                    params: signature.params,
                    variadic: signature.variadic,
                    results: signature.results,
                }
            }
            ExprKind::Ellipsis(Some(element)) => TypeNode::Ellipsis {
                value: component!(element),
            },
            _ => return reject(),
        };

        let node = Node::ty(ty, expr.position.clone()).with_type(self.go_type(expr.node_id)?);
        Ok(Some(node))
    }
}
