//! Go IR Bridge - Frontend
//!
//! This crate provides the Go-facing half of the bridge:
//! - Lexer: tokenizes Go source, inserting implicit semicolons
//! - Parser: builds the syntax tree from tokens, attaching comments
//! - AST: syntax tree definitions keyed by [`NodeId`]
//! - Semantic: the contract for type checker facts consumed by lowering

pub mod lexer;
pub mod parser;
pub mod ast;
pub mod semantic;

pub use lexer::{Lexer, Token, TokenType};
pub use parser::{ParseError, Parser};
pub use ast::{Decl, Expr, ExprKind, File, NodeId, NodeIdGenerator, Stmt, StmtKind};
pub use semantic::{
    BasicKind, ConstValue, ExactInt, ExactRational, FactTable, Initializer, NamedType,
    ObjectKind, SemanticFacts, SemanticType, Var,
};

use gir_common::BridgeError;
use log::debug;

/// Filename recorded for sources that did not come from disk
pub const STDIN_FILENAME: &str = "stdin";

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse one Go source file
    pub fn parse_file(source: &str, filename: &str) -> Result<File, BridgeError> {
        let mut node_ids = NodeIdGenerator::new();
        Self::parse_file_with_ids(source, filename, &mut node_ids)
    }

    /// Parse one file of a package, continuing the package's node numbering.
    pub fn parse_file_with_ids(
        source: &str,
        filename: &str,
        node_ids: &mut NodeIdGenerator,
    ) -> Result<File, BridgeError> {
        let tokens = Lexer::new(source, filename).tokenize()?;
        debug!("{}: {} tokens", filename, tokens.len());

        let mut parser = Parser::with_node_ids(tokens, std::mem::take(node_ids));
        let result = parser.parse_file();
        *node_ids = parser.into_node_ids();

        let file = result?;
        debug!("{}: package {} with {} declarations", filename, file.name.name, file.decls.len());
        Ok(file)
    }

    /// Parse a standalone expression
    pub fn parse_expression(source: &str) -> Result<Expr, BridgeError> {
        let tokens = Lexer::new(source, STDIN_FILENAME).tokenize()?;
        let mut parser = Parser::new(tokens);
        Ok(parser.parse_standalone_expression()?)
    }

    /// Parse statement text placed in the body of a fixed two-parameter
    /// function, `func blah(foo int, bar float64) string`.
    pub fn parse_statements(source: &str) -> Result<File, BridgeError> {
        let wrapped = format!(
            "package p; func blah(foo int, bar float64) string {{ {}}}",
            source
        );
        Self::parse_file(&wrapped, STDIN_FILENAME)
    }

    /// Tokenize source code (for debugging)
    pub fn tokenize_source(source: &str, filename: &str) -> Result<Vec<Token>, BridgeError> {
        Lexer::new(source, filename).tokenize()
    }
}
