//! File lowering
//!
//! One source file becomes one `file` document. Declarations are lowered in
//! source order; the leading run of import declarations is repeated under
//! `imports`.

use crate::context::LowerContext;
use crate::ir::FileDocument;
use crate::lower::comment_texts;
use gir_common::BridgeError;
use gir_frontend::ast::{Decl, DeclKeyword, File};
use log::debug;

fn is_import(decl: &Decl) -> bool {
    matches!(decl, Decl::Gen(gen) if gen.keyword == DeclKeyword::Import)
}

/// Lower `file`, recording `path` as its document path.
pub fn lower_file(ctx: LowerContext<'_>, file: &File, path: &str) -> Result<FileDocument, BridgeError> {
    debug!("lowering file {} (package {})", path, file.name.name);

    let declarations = file
        .decls
        .iter()
        .map(|decl| ctx.lower_decl(decl))
        .collect::<Result<Vec<_>, _>>()?;
    let leading_imports = file.decls.iter().take_while(|decl| is_import(decl)).count();
    let imports = declarations[..leading_imports].to_vec();

    Ok(FileDocument {
        path: path.to_string(),
        package_name: ctx.ident(&file.name),
        comments: comment_texts(file.doc.as_ref()),
        all_comments: file.comments.iter().map(|group| group.texts()).collect(),
        declarations,
        imports,
    })
}
