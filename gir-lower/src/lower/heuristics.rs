//! Disambiguation rules for syntactically ambiguous forms
//!
//! With semantic facts the resolved object kind decides; without them these
//! rules fall back to the shape of the already-lowered operands.

use crate::ir::{Expression, IdentNode, Node, NodeBody, TypeNode};
use gir_frontend::ast::Field;
use gir_frontend::{ExprKind, ObjectKind};

/// How `a.b` is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorForm {
    /// `a` names a package: a qualified identifier
    Qualified,
    /// Field or method access on a value
    Selector,
}

/// The identifier record of an unqualified identifier expression
pub fn unqualified_identifier(node: &Node) -> Option<&IdentNode> {
    match &node.body {
        NodeBody::Expression(Expression::Identifier {
            value,
            qualifier: None,
        }) => Some(value),
        _ => None,
    }
}

/// Classify `a.b` from the lowered left side.
pub fn classify_selector(has_facts: bool, lhs: &Node) -> SelectorForm {
    match unqualified_identifier(lhs) {
        Some(_) if !has_facts => SelectorForm::Qualified,
        Some(ident) if ident.ident_kind == Some(ObjectKind::PkgName) => SelectorForm::Qualified,
        _ => SelectorForm::Selector,
    }
}

/// Whether `a.b` names a type.
///
/// With facts, `b` must resolve to a type name; without them, any
/// unqualified `a` is assumed to be a package.
pub fn selector_names_type(has_facts: bool, selected: Option<ObjectKind>, lhs: &Node) -> bool {
    if has_facts {
        selected == Some(ObjectKind::TypeName)
    } else {
        unqualified_identifier(lhs).is_some()
    }
}

/// Whether a bare identifier may name a type. Unresolved names stay
/// candidates; names resolving to values do not.
pub fn ident_may_name_type(has_facts: bool, kind: Option<ObjectKind>) -> bool {
    if !has_facts {
        return true;
    }
    matches!(kind, None | Some(ObjectKind::TypeName))
}

/// A callee that lowers to a type other than a plain name is a conversion.
pub fn is_conversion(callee_type: &Node) -> bool {
    !matches!(callee_type.body, NodeBody::Type(TypeNode::Identifier { .. }))
}

/// Split a parameter list into ordinary parameters and the trailing
/// variadic parameter, if the last one is `...T`.
pub fn split_variadic(params: &[Field]) -> (&[Field], Option<&Field>) {
    match params.split_last() {
        Some((last, rest)) if matches!(last.ty.kind, ExprKind::Ellipsis(_)) => (rest, Some(last)),
        _ => (params, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gir_common::SourcePosition;
    use gir_frontend::ast::{Expr, Ident};

    fn ident_node(name: &str, kind: Option<ObjectKind>) -> IdentNode {
        IdentNode {
            ident_kind: kind,
            value: name.to_string(),
            position: SourcePosition::unspecified(),
        }
    }

    fn identifier(name: &str, kind: Option<ObjectKind>, qualified: bool) -> Node {
        Node::expression(
            Expression::Identifier {
                value: ident_node(name, kind),
                qualifier: qualified.then(|| ident_node("pkg", None)),
            },
            SourcePosition::unspecified(),
        )
    }

    fn field(ty: ExprKind) -> Field {
        Field {
            names: vec![],
            ty: Expr::new(0, ty, SourcePosition::unspecified()),
            tag: None,
            position: SourcePosition::unspecified(),
        }
    }

    fn named_type(name: &str) -> ExprKind {
        ExprKind::Ident(Ident {
            node_id: 0,
            name: name.to_string(),
            position: SourcePosition::unspecified(),
        })
    }

    #[test]
    fn test_selector_without_facts() {
        assert_eq!(classify_selector(false, &identifier("fmt", None, false)), SelectorForm::Qualified);
        assert_eq!(classify_selector(false, &identifier("b", None, true)), SelectorForm::Selector);
    }

    #[test]
    fn test_selector_with_facts() {
        let pkg = identifier("fmt", Some(ObjectKind::PkgName), false);
        let var = identifier("v", Some(ObjectKind::Var), false);
        assert_eq!(classify_selector(true, &pkg), SelectorForm::Qualified);
        assert_eq!(classify_selector(true, &var), SelectorForm::Selector);
    }

    #[test]
    fn test_selector_type_detection() {
        let lhs = identifier("time", Some(ObjectKind::PkgName), false);
        assert!(selector_names_type(true, Some(ObjectKind::TypeName), &lhs));
        assert!(!selector_names_type(true, Some(ObjectKind::Func), &lhs));
        assert!(selector_names_type(false, None, &lhs));
        assert!(!selector_names_type(false, None, &identifier("x", None, true)));
    }

    #[test]
    fn test_ident_type_candidates() {
        assert!(ident_may_name_type(false, Some(ObjectKind::Var)));
        assert!(ident_may_name_type(true, None));
        assert!(ident_may_name_type(true, Some(ObjectKind::TypeName)));
        assert!(!ident_may_name_type(true, Some(ObjectKind::Func)));
    }

    #[test]
    fn test_split_variadic() {
        let params = vec![
            field(named_type("int")),
            field(ExprKind::Ellipsis(Some(Box::new(Expr::new(
                1,
                named_type("string"),
                SourcePosition::unspecified(),
            ))))),
        ];
        let (ordinary, variadic) = split_variadic(&params);
        assert_eq!(ordinary.len(), 1);
        assert!(variadic.is_some());

        let (ordinary, variadic) = split_variadic(&params[..1]);
        assert_eq!(ordinary.len(), 1);
        assert!(variadic.is_none());

        let (ordinary, variadic) = split_variadic(&[]);
        assert!(ordinary.is_empty() && variadic.is_none());
    }
}
