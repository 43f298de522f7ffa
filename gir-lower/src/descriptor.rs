//! Type descriptor rendering
//!
//! Renders a resolved [`SemanticType`] structurally. Recursion is bounded:
//! rendering deeper than [`MAX_TYPE_DEPTH`] levels fails instead of
//! truncating, which is also how self-referential named types end.

use crate::ir::{MemberDescriptor, ReceiverDescriptor, TypeDescriptor};
use gir_common::{BridgeError, MAX_TYPE_DEPTH};
use gir_frontend::{SemanticType, Var};

/// Render a type descriptor starting at depth zero
pub fn render_type(ty: &SemanticType) -> Result<TypeDescriptor, BridgeError> {
    render_at(ty, 0)
}

fn boxed(ty: &SemanticType, depth: usize) -> Result<Box<TypeDescriptor>, BridgeError> {
    render_at(ty, depth).map(Box::new)
}

fn members(vars: &[Var], depth: usize) -> Result<Vec<MemberDescriptor>, BridgeError> {
    vars.iter()
        .map(|var| {
            Ok(MemberDescriptor {
                name: var.name.clone(),
                ty: boxed(&var.ty, depth)?,
            })
        })
        .collect()
}

fn tuple(vars: &[Var], depth: usize) -> Result<Box<TypeDescriptor>, BridgeError> {
    check_depth(depth)?;
    Ok(Box::new(TypeDescriptor::Tuple {
        fields: members(vars, depth + 1)?,
    }))
}

fn check_depth(depth: usize) -> Result<(), BridgeError> {
    if depth > MAX_TYPE_DEPTH {
        return Err(BridgeError::DepthLimit {
            limit: MAX_TYPE_DEPTH,
        });
    }
    Ok(())
}

fn render_at(ty: &SemanticType, depth: usize) -> Result<TypeDescriptor, BridgeError> {
    check_depth(depth)?;
    let next = depth + 1;

    let descriptor = match ty {
        SemanticType::Array { elem, len } => TypeDescriptor::Array {
            elem: boxed(elem, next)?,
            len: *len,
        },
        SemanticType::Basic(kind) => TypeDescriptor::Basic { kind: *kind },
        SemanticType::Chan { dir, elem } => TypeDescriptor::Chan {
            direction: *dir,
            elem: boxed(elem, next)?,
        },
        SemanticType::Interface { methods } => TypeDescriptor::Interface {
            methods: members(methods, next)?,
        },
        SemanticType::Map { key, elem } => TypeDescriptor::Map {
            key: boxed(key, next)?,
            elem: boxed(elem, next)?,
        },
        SemanticType::Named(named) => TypeDescriptor::Named {
            underlying: named
                .underlying()
                .map(|underlying| boxed(underlying, next))
                .transpose()?,
        },
        SemanticType::Pointer { elem } => TypeDescriptor::Pointer {
            elem: boxed(elem, next)?,
        },
        SemanticType::Signature {
            params,
            recv,
            results,
            variadic,
        } => TypeDescriptor::Signature {
            params: tuple(params, next)?,
            recv: recv.as_ref().map(|var| ReceiverDescriptor {
                name: var.name.clone(),
            }),
            results: tuple(results, next)?,
            variadic: *variadic,
        },
        SemanticType::Slice { elem } => TypeDescriptor::Slice {
            elem: boxed(elem, next)?,
        },
        SemanticType::Struct { fields } => TypeDescriptor::Struct {
            fields: members(fields, next)?,
        },
        SemanticType::Tuple { vars } => TypeDescriptor::Tuple {
            fields: members(vars, next)?,
        },
    };
    Ok(descriptor)
}
