//! Canonical IR schema
//!
//! Every record carries a `kind` and, within a kind, a `type` tag. The JSON
//! keys produced by `serde` are the wire format consumed by analysis tools.

use gir_common::SourcePosition;
use gir_frontend::ast::{ChanDir, LitKind};
use gir_frontend::{BasicKind, ObjectKind};
use serde::{Serialize, Serializer};

/// One IR node with its position and, when facts were supplied, its type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub body: NodeBody,
    pub position: SourcePosition,
    #[serde(rename = "go-type", skip_serializing_if = "Option::is_none")]
    pub go_type: Option<TypeDescriptor>,
}

impl Node {
    pub fn new(body: NodeBody, position: SourcePosition) -> Self {
        Self {
            body,
            position,
            go_type: None,
        }
    }

    pub fn with_type(mut self, go_type: Option<TypeDescriptor>) -> Self {
        self.go_type = go_type;
        self
    }

    pub fn expression(expr: Expression, position: SourcePosition) -> Self {
        Self::new(NodeBody::Expression(expr), position)
    }

    pub fn literal(literal: Literal, position: SourcePosition) -> Self {
        Self::new(NodeBody::Literal(literal), position)
    }

    pub fn ty(ty: TypeNode, position: SourcePosition) -> Self {
        Self::new(NodeBody::Type(ty), position)
    }

    pub fn statement(stmt: Statement, position: SourcePosition) -> Self {
        Self::new(NodeBody::Statement(stmt), position)
    }

    pub fn decl(decl: Declaration, position: SourcePosition) -> Self {
        Self::new(NodeBody::Decl(decl), position)
    }

    pub fn spec(spec: Spec, position: SourcePosition) -> Self {
        Self::new(NodeBody::Spec(spec), position)
    }

    pub fn field(field: FieldNode, position: SourcePosition) -> Self {
        Self::new(NodeBody::Field(field), position)
    }

    /// The `type` tag of this node
    pub fn tag(&self) -> &'static str {
        match &self.body {
            NodeBody::Expression(e) => e.tag(),
            NodeBody::Literal(l) => l.tag(),
            NodeBody::Type(t) => t.tag(),
            NodeBody::Constant { .. } => "constant",
            NodeBody::Statement(_) => "statement",
            NodeBody::Decl(_) => "decl",
            NodeBody::Spec(_) => "spec",
            NodeBody::Field(_) => "field",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum NodeBody {
    #[serde(rename = "expression")]
    Expression(Expression),
    #[serde(rename = "literal")]
    Literal(Literal),
    #[serde(rename = "type")]
    Type(TypeNode),
    /// A compile-time constant; `value` is null for constants of unknown kind.
    #[serde(rename = "constant")]
    Constant { value: Option<ConstantRecord> },
    #[serde(rename = "statement")]
    Statement(Statement),
    #[serde(rename = "decl")]
    Decl(Declaration),
    #[serde(rename = "spec")]
    Spec(Spec),
    #[serde(rename = "field")]
    Field(FieldNode),
}

fn serialize_ident_kind<S: Serializer>(kind: &Option<ObjectKind>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(kind.map(|k| k.as_str()).unwrap_or("NoKind"))
}

/// A name occurrence: identifiers, labels, field and package names
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename = "ident")]
pub struct IdentNode {
    #[serde(rename = "ident-kind", serialize_with = "serialize_ident_kind")]
    pub ident_kind: Option<ObjectKind>,
    pub value: String,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
    #[serde(rename = "identifier")]
    Identifier {
        value: IdentNode,
        #[serde(skip_serializing_if = "Option::is_none")]
        qualifier: Option<IdentNode>,
    },
    #[serde(rename = "ellipsis")]
    Ellipsis { value: Option<Box<Node>> },
    #[serde(rename = "binary")]
    Binary {
        left: Box<Node>,
        right: Box<Node>,
        operator: String,
    },
    #[serde(rename = "index")]
    Index { target: Box<Node>, index: Box<Node> },
    #[serde(rename = "star")]
    Star { target: Box<Node> },
    #[serde(rename = "paren")]
    Paren { target: Box<Node> },
    #[serde(rename = "selector")]
    Selector { target: Box<Node>, field: IdentNode },
    #[serde(rename = "type-assert")]
    TypeAssert {
        target: Box<Node>,
        asserted: Option<Box<Node>>,
    },
    #[serde(rename = "unary")]
    Unary { target: Box<Node>, operator: String },
    #[serde(rename = "slice")]
    Slice {
        target: Box<Node>,
        low: Option<Box<Node>>,
        high: Option<Box<Node>>,
        max: Option<Box<Node>>,
        three: bool,
    },
    #[serde(rename = "key-value")]
    KeyValue { key: Box<Node>, value: Box<Node> },
    #[serde(rename = "new")]
    New { argument: Box<Node> },
    #[serde(rename = "make")]
    Make { argument: Box<Node>, rest: Vec<Node> },
    #[serde(rename = "cast")]
    Cast {
        target: Box<Node>,
        #[serde(rename = "coerced-to")]
        coerced_to: Box<Node>,
    },
    #[serde(rename = "call")]
    Call {
        function: Box<Node>,
        arguments: Vec<Node>,
        ellipsis: bool,
    },
}

impl Expression {
    pub fn tag(&self) -> &'static str {
        match self {
            Expression::Identifier { .. } => "identifier",
            Expression::Ellipsis { .. } => "ellipsis",
            Expression::Binary { .. } => "binary",
            Expression::Index { .. } => "index",
            Expression::Star { .. } => "star",
            Expression::Paren { .. } => "paren",
            Expression::Selector { .. } => "selector",
            Expression::TypeAssert { .. } => "type-assert",
            Expression::Unary { .. } => "unary",
            Expression::Slice { .. } => "slice",
            Expression::KeyValue { .. } => "key-value",
            Expression::New { .. } => "new",
            Expression::Make { .. } => "make",
            Expression::Cast { .. } => "cast",
            Expression::Call { .. } => "call",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Literal {
    #[serde(rename = "INT")]
    Int { value: String },
    #[serde(rename = "FLOAT")]
    Float { value: String },
    #[serde(rename = "IMAG")]
    Imag { value: String },
    #[serde(rename = "CHAR")]
    Char { value: String },
    #[serde(rename = "STRING")]
    String { value: String },
    #[serde(rename = "BOOL")]
    Bool { value: String },
    #[serde(rename = "IOTA")]
    Iota,
    #[serde(rename = "function")]
    Function {
        params: Vec<Node>,
        variadic: Option<Box<Node>>,
        results: Option<Vec<Node>>,
        body: Vec<Node>,
    },
    #[serde(rename = "composite")]
    Composite {
        declared: Option<Box<Node>>,
        values: Vec<Node>,
    },
}

impl Literal {
    /// A literal token kept as its raw source text
    pub fn basic(kind: LitKind, value: String) -> Self {
        match kind {
            LitKind::Int => Literal::Int { value },
            LitKind::Float => Literal::Float { value },
            LitKind::Imag => Literal::Imag { value },
            LitKind::Char => Literal::Char { value },
            LitKind::String => Literal::String { value },
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Literal::Int { .. } => "INT",
            Literal::Float { .. } => "FLOAT",
            Literal::Imag { .. } => "IMAG",
            Literal::Char { .. } => "CHAR",
            Literal::String { .. } => "STRING",
            Literal::Bool { .. } => "BOOL",
            Literal::Iota => "IOTA",
            Literal::Function { .. } => "function",
            Literal::Composite { .. } => "composite",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TypeNode {
    #[serde(rename = "identifier")]
    Identifier {
        value: IdentNode,
        #[serde(skip_serializing_if = "Option::is_none")]
        qualifier: Option<IdentNode>,
    },
    #[serde(rename = "slice")]
    Slice { element: Box<Node> },
    #[serde(rename = "array")]
    Array { element: Box<Node>, length: Box<Node> },
    #[serde(rename = "pointer")]
    Pointer { contained: Box<Node> },
    #[serde(rename = "interface")]
    Interface { incomplete: bool, methods: Vec<Node> },
    #[serde(rename = "map")]
    Map { key: Box<Node>, value: Box<Node> },
    #[serde(rename = "chan")]
    Chan { direction: ChanDir, value: Box<Node> },
    #[serde(rename = "struct")]
    Struct { fields: Vec<Node> },
    #[serde(rename = "function")]
    Function {
        params: Vec<Node>,
        variadic: Option<Box<Node>>,
        results: Option<Vec<Node>>,
    },
    #[serde(rename = "ellipsis")]
    Ellipsis { value: Box<Node> },
}

impl TypeNode {
    pub fn tag(&self) -> &'static str {
        match self {
            TypeNode::Identifier { .. } => "identifier",
            TypeNode::Slice { .. } => "slice",
            TypeNode::Array { .. } => "array",
            TypeNode::Pointer { .. } => "pointer",
            TypeNode::Interface { .. } => "interface",
            TypeNode::Map { .. } => "map",
            TypeNode::Chan { .. } => "chan",
            TypeNode::Struct { .. } => "struct",
            TypeNode::Function { .. } => "function",
            TypeNode::Ellipsis { .. } => "ellipsis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
    #[serde(rename = "return")]
    Return { values: Vec<Node> },
    #[serde(rename = "assign")]
    Assign { left: Vec<Node>, right: Vec<Node> },
    #[serde(rename = "define")]
    Define { left: Vec<Node>, right: Vec<Node> },
    #[serde(rename = "assign-operator")]
    AssignOperator {
        operator: String,
        left: Vec<Node>,
        right: Vec<Node>,
    },
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "expression")]
    Expression { value: Box<Node> },
    #[serde(rename = "labeled")]
    Labeled { label: IdentNode, statement: Box<Node> },
    #[serde(rename = "break")]
    Break { label: Option<IdentNode> },
    #[serde(rename = "continue")]
    Continue { label: Option<IdentNode> },
    #[serde(rename = "goto")]
    Goto { label: Option<IdentNode> },
    #[serde(rename = "fallthrough")]
    Fallthrough,
    #[serde(rename = "range")]
    Range {
        key: Option<Box<Node>>,
        value: Option<Box<Node>>,
        target: Box<Node>,
        #[serde(rename = "is-assign")]
        is_assign: bool,
        body: Vec<Node>,
    },
    #[serde(rename = "declaration")]
    Declaration { target: Box<Node> },
    #[serde(rename = "defer")]
    Defer { target: Box<Node> },
    #[serde(rename = "go")]
    Go { target: Box<Node> },
    #[serde(rename = "if")]
    If {
        init: Option<Box<Node>>,
        condition: Box<Node>,
        body: Vec<Node>,
        #[serde(rename = "else")]
        else_branch: Option<Box<Node>>,
    },
    #[serde(rename = "block")]
    Block { body: Vec<Node> },
    #[serde(rename = "for")]
    For {
        init: Option<Box<Node>>,
        condition: Option<Box<Node>>,
        post: Option<Box<Node>>,
        body: Vec<Node>,
    },
    #[serde(rename = "send")]
    Send { channel: Box<Node>, value: Box<Node> },
    #[serde(rename = "select")]
    Select { body: Vec<Node> },
    #[serde(rename = "crement")]
    Crement { target: Box<Node>, operation: String },
    #[serde(rename = "switch")]
    Switch {
        init: Option<Box<Node>>,
        condition: Option<Box<Node>>,
        body: Vec<Node>,
    },
    #[serde(rename = "type-switch")]
    TypeSwitch {
        init: Option<Box<Node>>,
        assign: Box<Node>,
        body: Vec<Node>,
    },
    #[serde(rename = "select-clause")]
    SelectClause {
        statement: Option<Box<Node>>,
        body: Vec<Node>,
    },
    #[serde(rename = "case-clause")]
    CaseClause { expressions: Vec<Node>, body: Vec<Node> },
    /// One step of package variable initialization
    #[serde(rename = "initializer")]
    Initializer { vars: Vec<Node>, value: Box<Node> },
}

/// One `name = type` binding of a type declaration group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeBind {
    pub name: IdentNode,
    pub value: Node,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Declaration {
    #[serde(rename = "type-alias")]
    TypeAlias { binds: Vec<TypeBind> },
    #[serde(rename = "import")]
    Import { specs: Vec<Node> },
    #[serde(rename = "const")]
    Const { specs: Vec<Node> },
    #[serde(rename = "var")]
    Var { specs: Vec<Node> },
    #[serde(rename = "function")]
    Function {
        name: IdentNode,
        body: Option<Vec<Node>>,
        params: Vec<Node>,
        variadic: Option<Box<Node>>,
        results: Option<Vec<Node>>,
        comments: Vec<String>,
    },
    #[serde(rename = "method")]
    Method {
        receiver: Box<Node>,
        name: IdentNode,
        body: Option<Vec<Node>>,
        params: Vec<Node>,
        variadic: Option<Box<Node>>,
        results: Option<Vec<Node>>,
        comments: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Spec {
    #[serde(rename = "import")]
    Import {
        doc: Vec<String>,
        comments: Vec<String>,
        name: Option<IdentNode>,
        path: String,
    },
    #[serde(rename = "const")]
    Const(ValueSpecNode),
    #[serde(rename = "var")]
    Var(ValueSpecNode),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueSpecNode {
    pub names: Vec<IdentNode>,
    #[serde(rename = "declared-type")]
    pub declared_type: Option<Box<Node>>,
    pub values: Vec<Node>,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldNode {
    pub names: Vec<IdentNode>,
    #[serde(rename = "declared-type")]
    pub declared_type: Box<Node>,
    pub tag: Option<Box<Node>>,
}

/// Exact constant value record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ConstantRecord {
    #[serde(rename = "BOOL")]
    Bool { value: String },
    #[serde(rename = "STRING")]
    String { value: String },
    #[serde(rename = "INT")]
    Int { value: String },
    #[serde(rename = "FLOAT")]
    Float {
        numerator: Box<ConstantRecord>,
        denominator: Box<ConstantRecord>,
    },
    /// The real part as numerator/denominator, plus the imaginary part
    #[serde(rename = "COMPLEX")]
    Complex {
        numerator: Box<ConstantRecord>,
        denominator: Box<ConstantRecord>,
        imaginary: RationalRecord,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RationalRecord {
    pub numerator: Box<ConstantRecord>,
    pub denominator: Box<ConstantRecord>,
}

/// Structural rendering of a resolved type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TypeDescriptor {
    Array {
        elem: Box<TypeDescriptor>,
        len: i64,
    },
    Basic {
        kind: BasicKind,
    },
    Chan {
        direction: ChanDir,
        elem: Box<TypeDescriptor>,
    },
    Interface {
        methods: Vec<MemberDescriptor>,
    },
    Map {
        key: Box<TypeDescriptor>,
        elem: Box<TypeDescriptor>,
    },
    Named {
        underlying: Option<Box<TypeDescriptor>>,
    },
    Pointer {
        elem: Box<TypeDescriptor>,
    },
    Signature {
        params: Box<TypeDescriptor>,
        recv: Option<ReceiverDescriptor>,
        results: Box<TypeDescriptor>,
        variadic: bool,
    },
    Slice {
        elem: Box<TypeDescriptor>,
    },
    Struct {
        fields: Vec<MemberDescriptor>,
    },
    Tuple {
        fields: Vec<MemberDescriptor>,
    },
}

/// A named member of a struct, tuple or interface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Box<TypeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiverDescriptor {
    pub name: String,
}

/// IR of one source file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename = "file")]
pub struct FileDocument {
    pub path: String,
    #[serde(rename = "package-name")]
    pub package_name: IdentNode,
    pub comments: Vec<String>,
    #[serde(rename = "all-comments")]
    pub all_comments: Vec<Vec<String>>,
    pub declarations: Vec<Node>,
    /// The leading run of import declarations, repeated from `declarations`
    pub imports: Vec<Node>,
}

/// IR of one package and its initialization order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageDocument {
    pub name: String,
    pub path: String,
    pub imports: Vec<String>,
    #[serde(rename = "file-paths")]
    pub file_paths: Vec<String>,
    pub files: Vec<FileDocument>,
    pub initializers: Vec<Node>,
}

/// Whole-program IR: the entry package and its dependencies in safe order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramDocument {
    pub name: String,
    pub package: PackageDocument,
    pub imports: Vec<PackageDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pos() -> SourcePosition {
        SourcePosition::new("t.go", 1, 0, 1)
    }

    fn ident(name: &str) -> IdentNode {
        IdentNode {
            ident_kind: None,
            value: name.to_string(),
            position: pos(),
        }
    }

    #[test]
    fn test_expression_wire_shape() {
        let node = Node::expression(
            Expression::Identifier {
                value: ident("x"),
                qualifier: None,
            },
            pos(),
        );
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "kind": "expression",
                "type": "identifier",
                "value": {
                    "kind": "ident",
                    "ident-kind": "NoKind",
                    "value": "x",
                    "position": {"filename": "t.go", "line": 1, "offset": 0, "column": 1}
                },
                "position": {"filename": "t.go", "line": 1, "offset": 0, "column": 1}
            })
        );
    }

    #[test]
    fn test_unit_variants_and_go_type() {
        let node = Node::literal(Literal::Iota, pos()).with_type(Some(TypeDescriptor::Basic {
            kind: BasicKind::UntypedInt,
        }));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["kind"], "literal");
        assert_eq!(value["type"], "IOTA");
        assert_eq!(value["go-type"], json!({"type": "Basic", "kind": "UntypedInt"}));

        let stmt = serde_json::to_value(Node::statement(Statement::Fallthrough, pos())).unwrap();
        assert_eq!(stmt["type"], "fallthrough");
        assert!(stmt.get("go-type").is_none());
    }

    #[test]
    fn test_constant_and_decl_kinds() {
        let constant = Node::new(
            NodeBody::Constant {
                value: Some(ConstantRecord::Int {
                    value: "7".to_string(),
                }),
            },
            pos(),
        );
        let value = serde_json::to_value(&constant).unwrap();
        assert_eq!(value["kind"], "constant");
        assert_eq!(value["value"], json!({"type": "INT", "value": "7"}));

        let decl = Node::decl(Declaration::Var { specs: vec![] }, pos());
        let value = serde_json::to_value(&decl).unwrap();
        assert_eq!(value["kind"], "decl");
        assert_eq!(value["type"], "var");
    }

    #[test]
    fn test_chan_direction_is_lowercase() {
        let descriptor = TypeDescriptor::Chan {
            direction: ChanDir::Both,
            elem: Box::new(TypeDescriptor::Basic {
                kind: BasicKind::Int,
            }),
        };
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({"type": "Chan", "direction": "both", "elem": {"type": "Basic", "kind": "Int"}})
        );
    }
}
