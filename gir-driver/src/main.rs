//! Go IR bridge driver
//!
//! Lowers a Go expression, statement snippet, file or whole program and
//! prints the IR as JSON on stdout. Failures leave through the
//! diagnostics reporter.

use clap::{Parser, Subcommand};
use gir_common::{BridgeError, DiagnosticsReporter, FailureMode, SourcePosition};
use gir_frontend::Frontend;
use gir_lower::{
    assemble_program, lower_expression_source, lower_file_source, lower_statement_source,
    LoaderConfig, SourceLoader,
};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "gir")]
#[command(about = "Lower Go source to a canonical JSON IR")]
#[command(version)]
struct Cli {
    /// Panic on failure instead of printing a diagnostic
    #[arg(long, global = true)]
    panic: bool,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lower a single expression
    Expr {
        /// Go expression text
        source: String,
    },

    /// Lower statements placed in the body of a two-parameter function
    Stmt {
        /// Go statement text
        source: String,
    },

    /// Lower one source file, without facts
    File {
        input: PathBuf,

        /// Print the parsed syntax tree instead of the IR
        #[arg(long)]
        ast: bool,
    },

    /// Lower a program and every package it imports
    Load {
        /// Entry file
        input: PathBuf,

        /// Directory holding go.mod (default: nearest ancestor of the entry)
        #[arg(long, value_name = "DIR")]
        module_root: Option<PathBuf>,

        #[arg(long, env = "GOPATH", value_name = "DIR")]
        gopath: Option<PathBuf>,

        #[arg(long, env = "GOROOT", value_name = "DIR")]
        goroot: Option<PathBuf>,
    },
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, BridgeError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    text.map_err(|err| BridgeError::internal_error(err.to_string(), SourcePosition::unspecified()))
}

fn read_input(path: &Path) -> Result<String, BridgeError> {
    fs::read_to_string(path)
        .map_err(|err| BridgeError::path_error(format!("{}: {}", path.display(), err)))
}

fn run(command: Commands, pretty: bool) -> Result<String, BridgeError> {
    match command {
        Commands::Expr { source } => to_json(&lower_expression_source(&source)?, pretty),
        Commands::Stmt { source } => to_json(&lower_statement_source(&source)?, pretty),
        Commands::File { input, ast } => {
            let source = read_input(&input)?;
            let path = input.display().to_string();
            if ast {
                let file = Frontend::parse_file(&source, &path)?;
                return Ok(format!("{:#?}", file));
            }
            to_json(&lower_file_source(&source, &path)?, pretty)
        }
        Commands::Load {
            input,
            module_root,
            gopath,
            goroot,
        } => {
            let config = LoaderConfig {
                module_root,
                gopath,
                goroot,
            };
            debug!("loader config: {:?}", config);
            let mut loader = SourceLoader::new(config);
            to_json(&assemble_program(&mut loader, &input)?, pretty)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let reporter = DiagnosticsReporter::new(if cli.panic {
        FailureMode::Panic
    } else {
        FailureMode::Report
    });

    match run(cli.command, cli.pretty) {
        Ok(output) => println!("{}", output),
        Err(err) => reporter.report(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_expr_command() {
        let output = run(
            Commands::Expr {
                source: "x + 1".to_string(),
            },
            false,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["type"], "binary");
        assert_eq!(value["operator"], "+");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gir", "stmt", "x++", "--pretty", "--panic"]).unwrap();
        assert!(cli.pretty && cli.panic);
        match cli.command {
            Commands::Stmt { source } => assert_eq!(source, "x++"),
            _ => panic!("Expected stmt command"),
        }
    }

    #[test]
    fn test_file_command_reports_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(
            Commands::File {
                input: dir.path().join("missing.go"),
                ast: false,
            },
            false,
        )
        .unwrap_err();
        assert_eq!(err.error_type(), "path_error");
    }

    #[test]
    fn test_load_command() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("go.mod"), "module demo\n").unwrap();
        fs::write(dir.path().join("main.go"), "package main\n\nfunc main() {}\n").unwrap();
        let output = run(
            Commands::Load {
                input: dir.path().join("main.go"),
                module_root: None,
                gopath: None,
                goroot: None,
            },
            true,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["name"], "main");
        assert_eq!(value["package"]["path"], "demo");
        assert_eq!(value["imports"], serde_json::json!([]));
    }
}
