//! Resolved semantic types
//!
//! The shapes a type checker attaches to expressions. Named types bind their
//! underlying type late so that recursive declarations
//! (`type List struct { next *List }`) can be represented as real cycles.

use crate::ast::ChanDir;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Basic type kinds, serialized with their canonical names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasicKind {
    Invalid,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UIntptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedComplex,
    UntypedString,
    UntypedNil,
}

impl BasicKind {
    pub const ALL: [BasicKind; 26] = [
        BasicKind::Invalid,
        BasicKind::Bool,
        BasicKind::Int,
        BasicKind::Int8,
        BasicKind::Int16,
        BasicKind::Int32,
        BasicKind::Int64,
        BasicKind::UInt,
        BasicKind::UInt8,
        BasicKind::UInt16,
        BasicKind::UInt32,
        BasicKind::UInt64,
        BasicKind::UIntptr,
        BasicKind::Float32,
        BasicKind::Float64,
        BasicKind::Complex64,
        BasicKind::Complex128,
        BasicKind::String,
        BasicKind::UnsafePointer,
        BasicKind::UntypedBool,
        BasicKind::UntypedInt,
        BasicKind::UntypedRune,
        BasicKind::UntypedFloat,
        BasicKind::UntypedComplex,
        BasicKind::UntypedString,
        BasicKind::UntypedNil,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BasicKind::Invalid => "Invalid",
            BasicKind::Bool => "Bool",
            BasicKind::Int => "Int",
            BasicKind::Int8 => "Int8",
            BasicKind::Int16 => "Int16",
            BasicKind::Int32 => "Int32",
            BasicKind::Int64 => "Int64",
            BasicKind::UInt => "UInt",
            BasicKind::UInt8 => "UInt8",
            BasicKind::UInt16 => "UInt16",
            BasicKind::UInt32 => "UInt32",
            BasicKind::UInt64 => "UInt64",
            BasicKind::UIntptr => "UIntptr",
            BasicKind::Float32 => "Float32",
            BasicKind::Float64 => "Float64",
            BasicKind::Complex64 => "Complex64",
            BasicKind::Complex128 => "Complex128",
            BasicKind::String => "String",
            BasicKind::UnsafePointer => "UnsafePointer",
            BasicKind::UntypedBool => "UntypedBool",
            BasicKind::UntypedInt => "UntypedInt",
            BasicKind::UntypedRune => "UntypedRune",
            BasicKind::UntypedFloat => "UntypedFloat",
            BasicKind::UntypedComplex => "UntypedComplex",
            BasicKind::UntypedString => "UntypedString",
            BasicKind::UntypedNil => "UntypedNil",
        }
    }

    /// `float32` or `float64`
    pub fn is_sized_float(&self) -> bool {
        matches!(self, BasicKind::Float32 | BasicKind::Float64)
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The symbol kind an identifier use resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Builtin,
    Const,
    Func,
    Label,
    Nil,
    PkgName,
    TypeName,
    Var,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Builtin => "Builtin",
            ObjectKind::Const => "Const",
            ObjectKind::Func => "Func",
            ObjectKind::Label => "Label",
            ObjectKind::Nil => "Nil",
            ObjectKind::PkgName => "PkgName",
            ObjectKind::TypeName => "TypeName",
            ObjectKind::Var => "Var",
        }
    }
}

/// A named, typed slot: struct field, tuple element or method
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub name: String,
    pub ty: Arc<SemanticType>,
}

impl Var {
    pub fn new(name: &str, ty: Arc<SemanticType>) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

/// A declared type; its underlying type may refer back to itself
pub struct NamedType {
    pub name: String,
    underlying: OnceLock<Arc<SemanticType>>,
}

impl NamedType {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            underlying: OnceLock::new(),
        })
    }

    /// Bind the underlying type; returns false if it was already bound.
    pub fn set_underlying(&self, ty: Arc<SemanticType>) -> bool {
        self.underlying.set(ty).is_ok()
    }

    pub fn underlying(&self) -> Option<&Arc<SemanticType>> {
        self.underlying.get()
    }
}

// Identity comparison; structural comparison would not terminate on cycles.
impl PartialEq for NamedType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl fmt::Debug for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedType").field("name", &self.name).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SemanticType {
    Array {
        elem: Arc<SemanticType>,
        len: i64,
    },
    Basic(BasicKind),
    Chan {
        dir: ChanDir,
        elem: Arc<SemanticType>,
    },
    Interface {
        methods: Vec<Var>,
    },
    Map {
        key: Arc<SemanticType>,
        elem: Arc<SemanticType>,
    },
    Named(Arc<NamedType>),
    Pointer {
        elem: Arc<SemanticType>,
    },
    Signature {
        params: Vec<Var>,
        recv: Option<Var>,
        results: Vec<Var>,
        variadic: bool,
    },
    Slice {
        elem: Arc<SemanticType>,
    },
    Struct {
        fields: Vec<Var>,
    },
    Tuple {
        vars: Vec<Var>,
    },
}

impl SemanticType {
    pub fn basic(kind: BasicKind) -> Arc<Self> {
        Arc::new(SemanticType::Basic(kind))
    }

    pub fn pointer(elem: Arc<SemanticType>) -> Arc<Self> {
        Arc::new(SemanticType::Pointer { elem })
    }

    pub fn slice(elem: Arc<SemanticType>) -> Arc<Self> {
        Arc::new(SemanticType::Slice { elem })
    }

    pub fn named(named: &Arc<NamedType>) -> Arc<Self> {
        Arc::new(SemanticType::Named(Arc::clone(named)))
    }

    pub fn as_basic(&self) -> Option<BasicKind> {
        match self {
            SemanticType::Basic(kind) => Some(*kind),
            _ => None,
        }
    }
}
