//! Go IR bridge - Lowering
//!
//! This crate turns Go syntax (plus optional semantic facts) into the
//! canonical IR defined in [`ir`]. Single expressions, statement snippets
//! and files are lowered directly; whole programs go through [`program`],
//! which walks the import graph using a [`PackageLoader`].

pub mod constant;
pub mod context;
pub mod descriptor;
pub mod file;
pub mod init_order;
pub mod ir;
pub mod loader;
pub mod lower;
pub mod program;

pub use constant::render_constant;
pub use context::LowerContext;
pub use descriptor::render_type;
pub use file::lower_file;
pub use ir::{FileDocument, Node, PackageDocument, ProgramDocument, TypeDescriptor};
pub use loader::{LoaderConfig, SourceLoader};
pub use program::{assemble_program, lower_package, LoadedPackage, PackageLoader, SourceFile};

use gir_common::BridgeError;
use gir_frontend::Frontend;
use log::info;

/// Lower expression text, without facts.
pub fn lower_expression_source(source: &str) -> Result<Node, BridgeError> {
    let expr = Frontend::parse_expression(source)?;
    LowerContext::syntactic().lower_expr(&expr)
}

/// Lower statement text as the body of the wrapper function; the document
/// path is the statement text itself.
pub fn lower_statement_source(source: &str) -> Result<FileDocument, BridgeError> {
    let file = Frontend::parse_statements(source)?;
    lower_file(LowerContext::syntactic(), &file, source)
}

/// Lower one file's source, without facts.
pub fn lower_file_source(source: &str, path: &str) -> Result<FileDocument, BridgeError> {
    info!("lowering {}", path);
    let file = Frontend::parse_file(source, path)?;
    lower_file(LowerContext::syntactic(), &file, path)
}
