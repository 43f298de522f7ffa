//! Integration tests for the Go frontend

use gir_frontend::ast::*;
use gir_frontend::{Frontend, TokenType};
use indoc::indoc;
use proptest::prelude::*;

const PROGRAM: &str = indoc! {r#"
    // Package shapes computes areas.
    package shapes

    import (
        "fmt"
        m "math"
    )

    type (
        Shape interface {
            Area() float64
        }
        Circle struct {
            R float64 `json:"r"`
        }
    )

    const Pi2 = m.Pi * 2

    var registry = map[string]Shape{}

    // Area of the circle.
    func (c *Circle) Area() float64 {
        return m.Pi * c.R * c.R
    }

    func Describe(shapes ...Shape) (out []string) {
        for i, s := range shapes {
            switch v := s.(type) {
            case *Circle:
                out = append(out, fmt.Sprintf("%d: circle %v", i, v.R))
            default:
                continue
            }
        }
        if len(out) == 0 {
            return nil
        }
        return
    }
"#};

#[test]
fn test_parse_realistic_program() {
    let file = Frontend::parse_file(PROGRAM, "shapes.go").unwrap();
    assert_eq!(file.name.name, "shapes");
    assert_eq!(file.import_paths(), vec!["fmt", "math"]);
    assert_eq!(file.decls.len(), 6);
    assert_eq!(
        file.doc.as_ref().unwrap().texts(),
        vec!["// Package shapes computes areas."]
    );

    match &file.decls[4] {
        Decl::Func(method) => {
            assert_eq!(method.name.name, "Area");
            assert!(method.receiver.is_some());
            assert_eq!(method.doc.as_ref().unwrap().texts(), vec!["// Area of the circle."]);
        }
        _ => panic!("Expected method declaration"),
    }

    match &file.decls[5] {
        Decl::Func(func) => {
            let last = func.ty.params.list.last().unwrap();
            assert!(matches!(last.ty.kind, ExprKind::Ellipsis(Some(_))));
            let body = func.body.as_ref().unwrap();
            assert!(matches!(body.statements[0].kind, StmtKind::Range { define: true, .. }));
            assert!(matches!(body.statements[1].kind, StmtKind::If { .. }));
            assert!(matches!(body.statements[2].kind, StmtKind::Return(ref v) if v.is_empty()));
        }
        _ => panic!("Expected function declaration"),
    }
}

#[test]
fn test_node_ids_are_unique() {
    fn collect(expr: &Expr, ids: &mut Vec<NodeId>) {
        ids.push(expr.node_id);
        match &expr.kind {
            ExprKind::Binary { left, right, .. } => {
                collect(left, ids);
                collect(right, ids);
            }
            ExprKind::Call { function, arguments, .. } => {
                collect(function, ids);
                arguments.iter().for_each(|a| collect(a, ids));
            }
            ExprKind::Selector { target, .. } | ExprKind::Paren(target) => collect(target, ids),
            _ => {}
        }
    }

    let expr = Frontend::parse_expression("f(a.b, (c + d) * e)").unwrap();
    let mut ids = Vec::new();
    collect(&expr, &mut ids);
    let mut deduped = ids.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(ids.len(), deduped.len());
}

#[test]
fn test_if_header_composite_needs_parens() {
    let file = Frontend::parse_file(
        "package p\nfunc f() { if x == (T{}) { return } }\n",
        "p.go",
    )
    .unwrap();
    assert_eq!(file.decls.len(), 1);

    // Without parentheses `T {` opens the if body.
    let broken = Frontend::parse_file("package p\nfunc f() { if x == T{} { return } }\n", "p.go");
    assert!(broken.is_err());
}

#[test]
fn test_syntax_error_position() {
    let err = Frontend::parse_file("package p\n\nfunc f() {\n\tx := \n}\n", "bad.go").unwrap_err();
    assert_eq!(err.error_type(), "syntax_error");
    let position = err.position();
    assert_eq!(position.filename, "bad.go");
    assert_eq!(position.line, 5);
}

proptest! {
    #[test]
    fn prop_integer_text_is_preserved(n in any::<u64>()) {
        let text = n.to_string();
        let tokens = Frontend::tokenize_source(&text, "n.go").unwrap();
        prop_assert_eq!(&tokens[0].token_type, &TokenType::IntLiteral(text.clone()));
    }

    #[test]
    fn prop_float_text_is_preserved(v in 0.0f64..1.0e12) {
        let text = format!("{:.6}", v);
        let tokens = Frontend::tokenize_source(&text, "f.go").unwrap();
        prop_assert_eq!(&tokens[0].token_type, &TokenType::FloatLiteral(text.clone()));
    }

    #[test]
    fn prop_identifiers_roundtrip(name in "[a-zA-Z_][a-zA-Z0-9_]{0,12}") {
        prop_assume!(!is_keyword(&name));
        let expr = Frontend::parse_expression(&name).unwrap();
        prop_assert_eq!(expr.as_ident().map(|i| i.name.clone()), Some(name));
    }
}

fn is_keyword(name: &str) -> bool {
    matches!(
        name,
        "break" | "case" | "chan" | "const" | "continue" | "default" | "defer" | "else"
            | "fallthrough" | "for" | "func" | "go" | "goto" | "if" | "import"
            | "interface" | "map" | "package" | "range" | "return" | "select"
            | "struct" | "switch" | "type" | "var"
    )
}
