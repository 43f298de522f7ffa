//! Expression lowering
//!
//! Rule order matters: a known constant wins over every shape rule, then
//! the boolean and `iota` literals, then the shape of the node itself.

use super::heuristics::{classify_selector, is_conversion, unqualified_identifier, SelectorForm};
use crate::constant::render_constant;
use crate::context::LowerContext;
use crate::descriptor::render_type;
use crate::ir::{Expression, Literal, Node, NodeBody, TypeDescriptor};
use gir_common::BridgeError;
use gir_frontend::ast::{BasicLit, Expr, ExprKind, Ident, LitKind, NodeId};
use gir_frontend::{BasicKind, SemanticType};

fn untyped_kind(kind: LitKind) -> BasicKind {
    match kind {
        LitKind::Int => BasicKind::UntypedInt,
        LitKind::Float => BasicKind::UntypedFloat,
        LitKind::Imag => BasicKind::UntypedComplex,
        LitKind::Char => BasicKind::UntypedRune,
        LitKind::String => BasicKind::UntypedString,
    }
}

fn first_argument<'e>(call: &Expr, arguments: &'e [Expr]) -> Result<&'e Expr, BridgeError> {
    arguments
        .first()
        .ok_or_else(|| BridgeError::unexpected_node(call.shape_name(), call.position.clone()))
}

impl LowerContext<'_> {
    /// Lower an expression in value position
    pub fn lower_expr(&self, expr: &Expr) -> Result<Node, BridgeError> {
        if let Some(constant) = self.attempt_constant(expr)? {
            return Ok(constant);
        }

        let position = expr.position.clone();
        let expression = match &expr.kind {
            ExprKind::Bad => {
                return Err(BridgeError::internal_error("encountered BadExpr", position));
            }
            ExprKind::Ident(ident) => return self.identifier(expr, ident),
            ExprKind::BasicLit(lit) => return self.basic_literal(lit, Some(expr.node_id)),
            ExprKind::Call {
                function,
                arguments,
                ellipsis,
            } => return self.call(expr, function, arguments, *ellipsis),
            ExprKind::Selector { target, selector } => {
                return self.selector(expr, target, selector)
            }
            ExprKind::FuncLit { ty, body } => {
                let signature = self.signature(ty)?;
                let literal = Literal::Function {
                    params: signature.params,
                    variadic: signature.variadic,
                    results: signature.results,
                    body: self.block(body)?,
                };
                return Ok(Node::literal(literal, position).with_type(self.go_type(expr.node_id)?));
            }
            ExprKind::CompositeLit { ty, elements } => {
                let declared = match ty {
                    Some(ty) => self.attempt_type(ty)?.map(Box::new),
                    None => None,
                };
                let literal = Literal::Composite {
                    declared,
                    values: self.exprs(elements)?,
                };
                return Ok(Node::literal(literal, position).with_type(self.go_type(expr.node_id)?));
            }
            ExprKind::ArrayType { .. }
            | ExprKind::StructType { .. }
            | ExprKind::FuncType(_)
            | ExprKind::InterfaceType { .. }
            | ExprKind::MapType { .. }
            | ExprKind::ChanType { .. } => return self.lower_type(expr),

            ExprKind::Ellipsis(element) => Expression::Ellipsis {
                value: self.optional_expr(element.as_deref())?,
            },
            ExprKind::Paren(inner) => Expression::Paren {
                target: self.boxed_expr(inner)?,
            },
            ExprKind::Index { target, index } => Expression::Index {
                target: self.boxed_expr(target)?,
                index: self.boxed_expr(index)?,
            },
            ExprKind::Slice {
                target,
                low,
                high,
                max,
                three,
            } => Expression::Slice {
                target: self.boxed_expr(target)?,
                low: self.optional_expr(low.as_deref())?,
                high: self.optional_expr(high.as_deref())?,
                max: self.optional_expr(max.as_deref())?,
                three: *three,
            },
            ExprKind::TypeAssert { target, asserted } => Expression::TypeAssert {
                target: self.boxed_expr(target)?,
                asserted: match asserted {
                    Some(asserted) => self.attempt_type(asserted)?.map(Box::new),
                    None => None,
                },
            },
            ExprKind::Star(inner) => Expression::Star {
                target: self.boxed_expr(inner)?,
            },
            ExprKind::Unary { op, operand } => Expression::Unary {
                target: self.boxed_expr(operand)?,
                operator: op.to_string(),
            },
            ExprKind::Binary { op, left, right } => Expression::Binary {
                left: self.boxed_expr(left)?,
                right: self.boxed_expr(right)?,
                operator: op.to_string(),
            },
            ExprKind::KeyValue { key, value } => Expression::KeyValue {
                key: self.boxed_expr(key)?,
                value: self.boxed_expr(value)?,
            },
        };

        Ok(Node::expression(expression, position).with_type(self.go_type(expr.node_id)?))
    }

    /// A `constant` node, when the facts know both value and type.
    fn attempt_constant(&self, expr: &Expr) -> Result<Option<Node>, BridgeError> {
        let (value, ty) = match self.constant(expr.node_id) {
            Some(known) => known,
            None => return Ok(None),
        };

        let value = match ty {
            SemanticType::Basic(kind) if kind.is_sized_float() => value.to_float(),
            _ => value.clone(),
        };
        let node = Node::new(
            NodeBody::Constant {
                value: render_constant(&value),
            },
            expr.position.clone(),
        );
        Ok(Some(node.with_type(Some(render_type(ty)?))))
    }

    fn identifier(&self, expr: &Expr, ident: &Ident) -> Result<Node, BridgeError> {
        let position = expr.position.clone();
        match ident.name.as_str() {
            "true" | "false" => Ok(Node::literal(
                Literal::Bool {
                    value: ident.name.clone(),
                },
                position,
            )),
            "iota" => Ok(Node::literal(Literal::Iota, position)),
            _ => {
                let identifier = Expression::Identifier {
                    value: self.ident(ident),
                    qualifier: None,
                };
                Ok(Node::expression(identifier, position).with_type(self.go_type(expr.node_id)?))
            }
        }
    }

    /// A literal token; with facts it is typed, by default as the untyped
    /// kind of its token.
    pub(crate) fn basic_literal(&self, lit: &BasicLit, node: Option<NodeId>) -> Result<Node, BridgeError> {
        let go_type = if self.has_facts() {
            match node.and_then(|id| self.semantic_type(id)) {
                Some(ty) => Some(render_type(ty)?),
                None => Some(TypeDescriptor::Basic {
                    kind: untyped_kind(lit.kind),
                }),
            }
        } else {
            None
        };
        let literal = Literal::basic(lit.kind, lit.value.clone());
        Ok(Node::literal(literal, lit.position.clone()).with_type(go_type))
    }

    fn selector(&self, expr: &Expr, target: &Expr, selector: &Ident) -> Result<Node, BridgeError> {
        let position = expr.position.clone();
        let lhs = self.lower_expr(target)?;

        if classify_selector(self.has_facts(), &lhs) == SelectorForm::Qualified {
            if let Some(qualifier) = unqualified_identifier(&lhs).cloned() {
                let identifier = Expression::Identifier {
                    value: self.ident(selector),
                    qualifier: Some(qualifier),
                };
                return Ok(Node::expression(identifier, position).with_type(self.go_type(expr.node_id)?));
            }
        }

        let selector = Expression::Selector {
            target: Box::new(lhs),
            field: self.ident(selector),
        };
        Ok(Node::expression(selector, position).with_type(self.go_type(expr.node_id)?))
    }

    fn call(
        &self,
        expr: &Expr,
        function: &Expr,
        arguments: &[Expr],
        ellipsis: bool,
    ) -> Result<Node, BridgeError> {
        let position = expr.position.clone();

        let builtin = match &function.kind {
            ExprKind::Ident(callee) if callee.name == "new" => Some(Expression::New {
                argument: Box::new(self.lower_type(first_argument(expr, arguments)?)?),
            }),
            ExprKind::Ident(callee) if callee.name == "make" => Some(Expression::Make {
                argument: Box::new(self.lower_type(first_argument(expr, arguments)?)?),
                rest: self.exprs(&arguments[1..])?,
            }),
            _ => None,
        };

        let expression = match builtin {
            Some(builtin) => builtin,
            None => match self.attempt_type(function)? {
                Some(callee) if is_conversion(&callee) => Expression::Cast {
                    target: self.boxed_expr(first_argument(expr, arguments)?)?,
                    coerced_to: Box::new(callee),
                },
                _ => Expression::Call {
                    function: self.boxed_expr(function)?,
                    arguments: self.exprs(arguments)?,
                    ellipsis,
                },
            },
        };

        Ok(Node::expression(expression, position).with_type(self.go_type(expr.node_id)?))
    }
}
