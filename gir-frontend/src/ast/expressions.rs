//! Expression AST nodes for Go
//!
//! Type syntax lives in the same enum as value expressions because Go's
//! grammar does not separate them: `T(x)` parses as a call whether `T` is a
//! function or a type.

use super::ops::{BinaryOp, UnaryOp};
use super::statements::Block;
use crate::ast::NodeId;
use gir_common::SourcePosition;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub node_id: NodeId,
    pub name: String,
    pub position: SourcePosition,
}

impl Ident {
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// AST Expression nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub node_id: NodeId,
    pub kind: ExprKind,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Placeholder for a construct the parser could not build
    Bad,

    /// Identifier; shares its node id with the expression
    Ident(Ident),

    /// `...T` in a parameter list, or `[...]T` length
    Ellipsis(Option<Box<Expr>>),

    BasicLit(BasicLit),

    FuncLit {
        ty: FuncType,
        body: Block,
    },

    /// `T{...}`; `ty` is absent for elided inner literals
    CompositeLit {
        ty: Option<Box<Expr>>,
        elements: Vec<Expr>,
    },

    Paren(Box<Expr>),

    /// `x.sel`
    Selector {
        target: Box<Expr>,
        selector: Ident,
    },

    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },

    Slice {
        target: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
        three: bool,
    },

    /// `x.(T)`; `asserted` is absent for `x.(type)`
    TypeAssert {
        target: Box<Expr>,
        asserted: Option<Box<Expr>>,
    },

    Call {
        function: Box<Expr>,
        arguments: Vec<Expr>,
        ellipsis: bool,
    },

    /// `*x`: dereference or pointer type
    Star(Box<Expr>),

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `key: value` inside a composite literal
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },

    /// `[N]T` or `[]T` (length absent)
    ArrayType {
        length: Option<Box<Expr>>,
        element: Box<Expr>,
    },

    StructType {
        fields: FieldList,
    },

    FuncType(FuncType),

    InterfaceType {
        methods: FieldList,
        incomplete: bool,
    },

    MapType {
        key: Box<Expr>,
        value: Box<Expr>,
    },

    ChanType {
        direction: ChanDir,
        value: Box<Expr>,
    },
}

impl Expr {
    pub fn new(node_id: NodeId, kind: ExprKind, position: SourcePosition) -> Self {
        Self {
            node_id,
            kind,
            position,
        }
    }

    /// Wrap an identifier; the expression reuses the identifier's id.
    pub fn ident(ident: Ident) -> Self {
        Self {
            node_id: ident.node_id,
            position: ident.position.clone(),
            kind: ExprKind::Ident(ident),
        }
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Paren(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }

    /// Name of the node shape, used in diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Bad => "BadExpr",
            ExprKind::Ident(_) => "Ident",
            ExprKind::Ellipsis(_) => "Ellipsis",
            ExprKind::BasicLit(_) => "BasicLit",
            ExprKind::FuncLit { .. } => "FuncLit",
            ExprKind::CompositeLit { .. } => "CompositeLit",
            ExprKind::Paren(_) => "ParenExpr",
            ExprKind::Selector { .. } => "SelectorExpr",
            ExprKind::Index { .. } => "IndexExpr",
            ExprKind::Slice { .. } => "SliceExpr",
            ExprKind::TypeAssert { .. } => "TypeAssertExpr",
            ExprKind::Call { .. } => "CallExpr",
            ExprKind::Star(_) => "StarExpr",
            ExprKind::Unary { .. } => "UnaryExpr",
            ExprKind::Binary { .. } => "BinaryExpr",
            ExprKind::KeyValue { .. } => "KeyValueExpr",
            ExprKind::ArrayType { .. } => "ArrayType",
            ExprKind::StructType { .. } => "StructType",
            ExprKind::FuncType(_) => "FuncType",
            ExprKind::InterfaceType { .. } => "InterfaceType",
            ExprKind::MapType { .. } => "MapType",
            ExprKind::ChanType { .. } => "ChanType",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

impl fmt::Display for LitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LitKind::Int => "INT",
            LitKind::Float => "FLOAT",
            LitKind::Imag => "IMAG",
            LitKind::Char => "CHAR",
            LitKind::String => "STRING",
        };
        write!(f, "{}", name)
    }
}

/// A literal token with its raw source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicLit {
    pub kind: LitKind,
    pub value: String,
    pub position: SourcePosition,
}

impl BasicLit {
    /// The text between the quotes of a string literal.
    pub fn unquoted(&self) -> &str {
        self.value.trim_matches(|c| c == '"' || c == '`')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChanDir {
    Send,
    Recv,
    Both,
}

impl fmt::Display for ChanDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChanDir::Send => "send",
            ChanDir::Recv => "recv",
            ChanDir::Both => "both",
        };
        write!(f, "{}", name)
    }
}

/// A struct field, parameter, result or interface method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<BasicLit>,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldList {
    pub list: Vec<Field>,
    pub position: SourcePosition,
}

impl FieldList {
    pub fn empty(position: SourcePosition) -> Self {
        Self {
            list: Vec::new(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncType {
    pub params: FieldList,
    /// Absent when the signature declares no results
    pub results: Option<FieldList>,
    pub position: SourcePosition,
}
