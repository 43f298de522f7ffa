//! Fields, parameter lists and signatures

use super::heuristics::split_variadic;
use crate::context::LowerContext;
use crate::ir::{FieldNode, Node};
use gir_common::BridgeError;
use gir_frontend::ast::{Field, FuncType};

/// A signature with the variadic parameter split out
pub(crate) struct LoweredSignature {
    pub params: Vec<Node>,
    pub variadic: Option<Box<Node>>,
    pub results: Option<Vec<Node>>,
}

impl LowerContext<'_> {
    pub fn lower_field(&self, field: &Field) -> Result<Node, BridgeError> {
        let tag = field
            .tag
            .as_ref()
            .map(|tag| self.basic_literal(tag, None))
            .transpose()?
            .map(Box::new);
        let node = FieldNode {
            names: self.idents(&field.names),
            declared_type: Box::new(self.lower_type(&field.ty)?),
            tag,
        };
        Ok(Node::field(node, field.position.clone()))
    }

    pub(crate) fn fields(&self, fields: &[Field]) -> Result<Vec<Node>, BridgeError> {
        fields.iter().map(|field| self.lower_field(field)).collect()
    }

    pub(crate) fn signature(&self, func: &FuncType) -> Result<LoweredSignature, BridgeError> {
        let (params, variadic) = split_variadic(&func.params.list);
        Ok(LoweredSignature {
            params: self.fields(params)?,
            variadic: variadic
                .map(|field| self.lower_field(field))
                .transpose()?
                .map(Box::new),
            results: func
                .results
                .as_ref()
                .map(|results| self.fields(&results.list))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::context::LowerContext;
    use crate::ir::{NodeBody, TypeNode};
    use gir_frontend::{ExprKind, Frontend};
    use serde_json::json;

    #[test]
    fn test_variadic_is_split_out() {
        let expr = Frontend::parse_expression("func(a int, b ...string)").unwrap();
        let func = match &expr.kind {
            ExprKind::FuncType(func) => func,
            _ => panic!("Expected function type"),
        };
        let signature = LowerContext::syntactic().signature(func).unwrap();
        assert_eq!(signature.params.len(), 1);
        assert!(signature.results.is_none());

        let variadic = serde_json::to_value(signature.variadic.unwrap()).unwrap();
        assert_eq!(variadic["kind"], "field");
        assert_eq!(variadic["names"][0]["value"], "b");
        assert_eq!(variadic["declared-type"]["type"], "ellipsis");
        assert_eq!(variadic["declared-type"]["value"]["value"]["value"], "string");
    }

    #[test]
    fn test_struct_field_tag() {
        let expr = Frontend::parse_expression("struct { Name string `json:\"name\"` }").unwrap();
        let node = LowerContext::syntactic().lower_type(&expr).unwrap();
        let fields = match &node.body {
            NodeBody::Type(TypeNode::Struct { fields }) => fields,
            _ => panic!("Expected struct type"),
        };
        let field = serde_json::to_value(&fields[0]).unwrap();
        assert_eq!(
            field["tag"]["value"],
            json!("`json:\"name\"`")
        );
        assert_eq!(field["tag"]["type"], "STRING");
        assert!(field["tag"].get("go-type").is_none());
    }
}
