//! Declaration, comment and file nodes for Go

use super::expressions::{BasicLit, Expr, FieldList, FuncType, Ident};
use super::statements::Block;
use gir_common::SourcePosition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `//` or `/* */` comment, raw text included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub position: SourcePosition,
}

/// Adjacent comments with no blank line or token between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    pub fn texts(&self) -> Vec<String> {
        self.list.iter().map(|c| c.text.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKeyword {
    Import,
    Const,
    Type,
    Var,
}

impl fmt::Display for DeclKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            DeclKeyword::Import => "import",
            DeclKeyword::Const => "const",
            DeclKeyword::Type => "type",
            DeclKeyword::Var => "var",
        };
        write!(f, "{}", keyword)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpec {
    pub doc: Option<CommentGroup>,
    /// Local name, `.` or `_`
    pub name: Option<Ident>,
    pub path: BasicLit,
    pub comment: Option<CommentGroup>,
    pub position: SourcePosition,
}

impl ImportSpec {
    /// The import path without its quotes.
    pub fn import_path(&self) -> String {
        self.path.unquoted().to_string()
    }
}

/// `const` or `var` member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub doc: Option<CommentGroup>,
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub comment: Option<CommentGroup>,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub doc: Option<CommentGroup>,
    pub name: Ident,
    /// `type A = B`
    pub alias: bool,
    pub ty: Expr,
    pub comment: Option<CommentGroup>,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spec {
    pub fn position(&self) -> &SourcePosition {
        match self {
            Spec::Import(spec) => &spec.position,
            Spec::Value(spec) => &spec.position,
            Spec::Type(spec) => &spec.position,
        }
    }
}

/// `import`, `const`, `type` or `var`, grouped or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenDecl {
    pub doc: Option<CommentGroup>,
    pub keyword: DeclKeyword,
    pub specs: Vec<Spec>,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub doc: Option<CommentGroup>,
    /// Method receiver list, absent for plain functions
    pub receiver: Option<FieldList>,
    pub name: Ident,
    pub ty: FuncType,
    /// Absent for functions implemented outside Go
    pub body: Option<Block>,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Bad(SourcePosition),
    Gen(GenDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn shape_name(&self) -> &'static str {
        match self {
            Decl::Bad(_) => "BadDecl",
            Decl::Gen(_) => "GenDecl",
            Decl::Func(_) => "FuncDecl",
        }
    }
}

/// One parsed source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub filename: String,
    pub doc: Option<CommentGroup>,
    pub package_position: SourcePosition,
    pub name: Ident,
    pub decls: Vec<Decl>,
    /// Every comment group in the file, in source order
    pub comments: Vec<CommentGroup>,
}

impl File {
    /// Import specs of every import declaration, in source order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.decls
            .iter()
            .filter_map(|decl| match decl {
                Decl::Gen(gen) if gen.keyword == DeclKeyword::Import => Some(gen.specs.iter()),
                _ => None,
            })
            .flatten()
            .filter_map(|spec| match spec {
                Spec::Import(import) => Some(import),
                _ => None,
            })
    }

    pub fn import_paths(&self) -> Vec<String> {
        self.imports().map(ImportSpec::import_path).collect()
    }
}
