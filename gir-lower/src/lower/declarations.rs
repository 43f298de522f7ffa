//! Declaration lowering: declaration groups, their specs, and functions

use super::comment_texts;
use crate::context::LowerContext;
use crate::ir::{Declaration, Node, Spec, TypeBind, ValueSpecNode};
use gir_common::{BridgeError, SourcePosition};
use gir_frontend::ast::{
    Decl, DeclKeyword, FuncDecl, GenDecl, ImportSpec, Spec as SpecSyntax, TypeSpec, ValueSpec,
};

fn mismatched_spec(decl: &GenDecl, spec: &SpecSyntax) -> BridgeError {
    BridgeError::internal_error(
        format!("{} declaration holds a mismatched spec", decl.keyword),
        spec.position().clone(),
    )
}

impl LowerContext<'_> {
    pub fn lower_decl(&self, decl: &Decl) -> Result<Node, BridgeError> {
        match decl {
            Decl::Bad(position) => Err(BridgeError::internal_error(
                "encountered BadDecl",
                position.clone(),
            )),
            Decl::Gen(gen) => self.lower_gen_decl(gen),
            Decl::Func(func) => self.lower_func_decl(func),
        }
    }

    /// `import`, `const`, `var`, or a `type` group.
    pub fn lower_gen_decl(&self, decl: &GenDecl) -> Result<Node, BridgeError> {
        if decl.keyword == DeclKeyword::Type {
            return self.type_group(decl);
        }

        let specs = decl
            .specs
            .iter()
            .map(|spec| -> Result<Node, BridgeError> {
                match (decl.keyword, spec) {
                    (DeclKeyword::Import, SpecSyntax::Import(import)) => Ok(self.import_spec(import)),
                    (DeclKeyword::Const, SpecSyntax::Value(value)) => {
                        let (node, position) = self.value_spec(value)?;
                        Ok(Node::spec(Spec::Const(node), position))
                    }
                    (DeclKeyword::Var, SpecSyntax::Value(value)) => {
                        let (node, position) = self.value_spec(value)?;
                        Ok(Node::spec(Spec::Var(node), position))
                    }
                    _ => Err(mismatched_spec(decl, spec)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let declaration = match decl.keyword {
            DeclKeyword::Import => Declaration::Import { specs },
            DeclKeyword::Const => Declaration::Const { specs },
            _ => Declaration::Var { specs },
        };
        Ok(Node::decl(declaration, decl.position.clone()))
    }

    /// Every type spec of a group becomes one bind; the group sits at its
    /// first spec.
    fn type_group(&self, decl: &GenDecl) -> Result<Node, BridgeError> {
        let specs: Vec<&TypeSpec> = decl
            .specs
            .iter()
            .map(|spec| match spec {
                SpecSyntax::Type(ty) => Ok(ty),
                _ => Err(mismatched_spec(decl, spec)),
            })
            .collect::<Result<_, _>>()?;

        let binds = specs
            .iter()
            .map(|spec| -> Result<TypeBind, BridgeError> {
                Ok(TypeBind {
                    name: self.ident(&spec.name),
                    value: self.lower_type(&spec.ty)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let position = specs
            .first()
            .map(|spec| spec.position.clone())
            .unwrap_or_else(|| decl.position.clone());
        Ok(Node::decl(Declaration::TypeAlias { binds }, position))
    }

    fn import_spec(&self, spec: &ImportSpec) -> Node {
        let import = Spec::Import {
            doc: comment_texts(spec.doc.as_ref()),
            comments: comment_texts(spec.comment.as_ref()),
            name: spec.name.as_ref().map(|name| self.ident(name)),
            path: spec.path.value.trim_matches('"').to_string(),
        };
        Node::spec(import, spec.position.clone())
    }

    fn value_spec(&self, spec: &ValueSpec) -> Result<(ValueSpecNode, SourcePosition), BridgeError> {
        let declared_type = match &spec.ty {
            Some(ty) => self.attempt_type(ty)?.map(Box::new),
            None => None,
        };
        let node = ValueSpecNode {
            names: self.idents(&spec.names),
            declared_type,
            values: self.exprs(&spec.values)?,
            comments: comment_texts(spec.comment.as_ref()),
        };
        Ok((node, spec.position.clone()))
    }

    /// A function, or a method when it has a receiver
    pub fn lower_func_decl(&self, func: &FuncDecl) -> Result<Node, BridgeError> {
        let signature = self.signature(&func.ty)?;
        let name = self.ident(&func.name);
        let body = func.body.as_ref().map(|body| self.block(body)).transpose()?;
        let comments = comment_texts(func.doc.as_ref());

        let declaration = match &func.receiver {
            None => Declaration::Function {
                name,
                body,
                params: signature.params,
                variadic: signature.variadic,
                results: signature.results,
                comments,
            },
            Some(receiver) => {
                let field = receiver.list.first().ok_or_else(|| {
                    BridgeError::internal_error("method without a receiver", receiver.position.clone())
                })?;
                Declaration::Method {
                    receiver: Box::new(self.lower_field(field)?),
                    name,
                    body,
                    params: signature.params,
                    variadic: signature.variadic,
                    results: signature.results,
                    comments,
                }
            }
        };
        Ok(Node::decl(declaration, func.position.clone()))
    }
}

#[cfg(test)]
mod tests {
    use crate::context::LowerContext;
    use gir_common::SourcePosition;
    use gir_frontend::ast::{Decl, FieldList, File};
    use gir_frontend::Frontend;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn parse(source: &str) -> File {
        Frontend::parse_file(source, "decls.go").unwrap()
    }

    fn lower_all(source: &str) -> Vec<Value> {
        let file = parse(source);
        let ctx = LowerContext::syntactic();
        file.decls
            .iter()
            .map(|decl| serde_json::to_value(ctx.lower_decl(decl).unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_import_specs() {
        let decls = lower_all(indoc! {r#"
            package p

            import (
                // Formatting.
                "fmt"
                str "strings" // renamed
            )
        "#});
        assert_eq!(decls[0]["kind"], "decl");
        assert_eq!(decls[0]["type"], "import");
        let specs = decls[0]["specs"].as_array().unwrap();
        assert_eq!(specs[0]["kind"], "spec");
        assert_eq!(specs[0]["path"], "fmt");
        assert_eq!(specs[0]["doc"], json!(["// Formatting."]));
        assert!(specs[0]["name"].is_null());
        assert_eq!(specs[1]["name"]["value"], "str");
        assert_eq!(specs[1]["comments"], json!(["// renamed"]));
    }

    #[test]
    fn test_value_specs() {
        let decls = lower_all(indoc! {"
            package p

            const (
                A, B = 1, 2 // pair
                C int = 3
            )

            var v = f(x)
        "});
        let specs = decls[0]["specs"].as_array().unwrap();
        assert_eq!(specs[0]["type"], "const");
        assert_eq!(specs[0]["names"][1]["value"], "B");
        assert!(specs[0]["declared-type"].is_null());
        assert_eq!(specs[0]["comments"], json!(["// pair"]));
        assert_eq!(specs[1]["declared-type"]["kind"], "type");
        assert_eq!(decls[1]["specs"][0]["type"], "var");
        assert_eq!(decls[1]["specs"][0]["values"][0]["type"], "call");
    }

    #[test]
    fn test_type_group_binds() {
        let decls = lower_all(indoc! {"
            package p

            type (
                Point struct { X, Y int }
                Ints = []int
            )
        "});
        assert_eq!(decls[0]["type"], "type-alias");
        let binds = decls[0]["binds"].as_array().unwrap();
        assert_eq!(binds[0]["name"]["value"], "Point");
        assert_eq!(binds[0]["value"]["type"], "struct");
        assert_eq!(binds[1]["value"]["type"], "slice");
        assert_eq!(decls[0]["position"]["line"], 4);
    }

    #[test]
    fn test_function_and_method() {
        let decls = lower_all(indoc! {"
            package p

            // Area of the rectangle.
            func (r *Rect) Area() int { return r.w * r.h }

            func printf(format string, args ...interface{})

            func pair() (a, b int) { return }
        "});
        let method = &decls[0];
        assert_eq!(method["type"], "method");
        assert_eq!(method["receiver"]["names"][0]["value"], "r");
        assert_eq!(method["receiver"]["declared-type"]["type"], "pointer");
        assert_eq!(method["comments"], json!(["// Area of the rectangle."]));
        assert_eq!(method["results"][0]["names"], json!([]));

        let external = &decls[1];
        assert_eq!(external["type"], "function");
        assert!(external["body"].is_null());
        assert_eq!(external["params"].as_array().unwrap().len(), 1);
        assert_eq!(external["variadic"]["names"][0]["value"], "args");
        assert!(external["results"].is_null());
        assert_eq!(external["comments"], json!([]));

        assert_eq!(decls[2]["results"][0]["names"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_method_without_receiver_field() {
        let mut file = parse("package p\nfunc (r R) M() {}\n");
        let func = match &mut file.decls[0] {
            Decl::Func(func) => func,
            _ => panic!("Expected method declaration"),
        };
        let position = func.position.clone();
        func.receiver = Some(FieldList::empty(position));
        let err = LowerContext::syntactic().lower_decl(&file.decls[0]).unwrap_err();
        assert_eq!(err.error_type(), "internal_error");
    }

    #[test]
    fn test_bad_decl() {
        let err = LowerContext::syntactic()
            .lower_decl(&Decl::Bad(SourcePosition::new("x.go", 3, 10, 1)))
            .unwrap_err();
        assert_eq!(err.error_type(), "internal_error");
        assert_eq!(err.info(), "encountered BadDecl");
    }
}
