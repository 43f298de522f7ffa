//! Whole-program assembly
//!
//! Resolves the entry package, walks its import graph depth-first and
//! lowers every package it reaches. Dependencies are listed before the
//! packages that import them and each import path appears once.

use crate::context::LowerContext;
use crate::file::lower_file;
use crate::init_order::{checked_init_order, init_order};
use crate::ir::{Expression, Node, PackageDocument, ProgramDocument, Statement};
use gir_common::BridgeError;
use gir_frontend::ast::File;
use gir_frontend::SemanticFacts;
use log::{debug, info};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// A parsed source file of a package
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub syntax: File,
}

/// A resolved package: its syntax and, when a checker ran, its facts
#[derive(Clone)]
pub struct LoadedPackage {
    pub name: String,
    /// Import path
    pub path: String,
    /// Direct imports, in ascending order
    pub imports: Vec<String>,
    pub files: Vec<SourceFile>,
    pub facts: Option<Arc<dyn SemanticFacts>>,
}

impl LoadedPackage {
    pub fn context(&self) -> LowerContext<'_> {
        LowerContext::new(self.facts.as_deref())
    }
}

impl std::fmt::Debug for LoadedPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPackage")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("imports", &self.imports)
            .field("files", &self.files.iter().map(|f| &f.path).collect::<Vec<_>>())
            .field("has_facts", &self.facts.is_some())
            .finish()
    }
}

/// Resolves packages for the assembler
pub trait PackageLoader {
    /// The package holding the entry file at `path`
    fn load_entry(&mut self, path: &Path) -> Result<Arc<LoadedPackage>, BridgeError>;

    /// The package with import path `import_path`
    fn load_import(&mut self, import_path: &str) -> Result<Arc<LoadedPackage>, BridgeError>;
}

/// Package initialization steps as `initializer` statements, in the
/// checker's order when the facts carry one
fn initializers(package: &LoadedPackage) -> Result<Vec<Node>, BridgeError> {
    let ctx = package.context();
    let files = package.files.iter().map(|file| &file.syntax);
    let steps = match package.facts.as_deref().and_then(|facts| facts.init_order()) {
        Some(order) => checked_init_order(files, order)?,
        None => init_order(files)?,
    };
    steps
        .into_iter()
        .map(|step| -> Result<Node, BridgeError> {
            let vars = step
                .names
                .iter()
                .map(|name| {
                    let identifier = Expression::Identifier {
                        value: ctx.ident(name),
                        qualifier: None,
                    };
                    Node::expression(identifier, name.position.clone())
                })
                .collect();
            let position = step.names[0].position.clone();
            let initializer = Statement::Initializer {
                vars,
                value: Box::new(ctx.lower_expr(step.value)?),
            };
            Ok(Node::statement(initializer, position))
        })
        .collect()
}

/// Lower every file of a package, plus its initialization order
pub fn lower_package(package: &LoadedPackage) -> Result<PackageDocument, BridgeError> {
    debug!("lowering package {} ({} files)", package.path, package.files.len());
    let ctx = package.context();
    let files = package
        .files
        .iter()
        .map(|file| lower_file(ctx, &file.syntax, &file.path))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PackageDocument {
        name: package.name.clone(),
        path: package.path.clone(),
        imports: package.imports.clone(),
        file_paths: package.files.iter().map(|file| file.path.clone()).collect(),
        files,
        initializers: initializers(package)?,
    })
}

/// Depth-first walk over the import graph
struct ImportWalk<'l> {
    loader: &'l mut dyn PackageLoader,
    visited: HashSet<String>,
    active: Vec<String>,
    order: Vec<Arc<LoadedPackage>>,
}

impl ImportWalk<'_> {
    fn visit(&mut self, import_path: &str) -> Result<(), BridgeError> {
        if self.active.iter().any(|p| p == import_path) {
            let mut cycle = self.active.clone();
            cycle.push(import_path.to_string());
            return Err(BridgeError::resolution_error(
                import_path,
                format!("import cycle: {}", cycle.join(" -> ")),
            ));
        }
        if self.visited.contains(import_path) {
            return Ok(());
        }

        let package = self.loader.load_import(import_path)?;
        debug!("resolved {} -> package {}", import_path, package.name);
        self.active.push(import_path.to_string());
        let mut imports = package.imports.clone();
        imports.sort();
        for dependency in &imports {
            self.visit(dependency)?;
        }
        self.active.pop();

        self.visited.insert(import_path.to_string());
        self.order.push(package);
        Ok(())
    }
}

/// Every package reachable from `roots`, dependencies first
pub fn flatten_imports(
    loader: &mut dyn PackageLoader,
    entry_path: &str,
    roots: &[String],
) -> Result<Vec<Arc<LoadedPackage>>, BridgeError> {
    let mut walk = ImportWalk {
        loader,
        visited: HashSet::new(),
        active: vec![entry_path.to_string()],
        order: Vec::new(),
    };
    let mut roots = roots.to_vec();
    roots.sort();
    for root in &roots {
        walk.visit(root)?;
    }
    Ok(walk.order)
}

/// Lower the program whose entry file is `entry`.
pub fn assemble_program(
    loader: &mut dyn PackageLoader,
    entry: &Path,
) -> Result<ProgramDocument, BridgeError> {
    let package = loader.load_entry(entry)?;
    info!("assembling program from {}", entry.display());

    let dependencies = flatten_imports(loader, &package.path, &package.imports)?;
    let imports = dependencies
        .iter()
        .map(|dependency| {
            debug!("appending package {}", dependency.path);
            lower_package(dependency)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProgramDocument {
        name: package.name.clone(),
        package: lower_package(&package)?,
        imports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gir_frontend::{BasicKind, FactTable, Frontend, Initializer, SemanticType};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Packages defined in memory, keyed by import path
    #[derive(Default)]
    struct MemoryLoader {
        packages: HashMap<String, Arc<LoadedPackage>>,
        loads: Vec<String>,
    }

    impl MemoryLoader {
        fn add(&mut self, path: &str, imports: &[&str], source: &str) {
            let syntax = Frontend::parse_file(source, &format!("{}/x.go", path)).unwrap();
            let package = LoadedPackage {
                name: syntax.name.name.clone(),
                path: path.to_string(),
                imports: imports.iter().map(|i| i.to_string()).collect(),
                files: vec![SourceFile {
                    path: format!("{}/x.go", path),
                    syntax,
                }],
                facts: None,
            };
            self.packages.insert(path.to_string(), Arc::new(package));
        }
    }

    impl PackageLoader for MemoryLoader {
        fn load_entry(&mut self, path: &Path) -> Result<Arc<LoadedPackage>, BridgeError> {
            self.load_import(&path.to_string_lossy())
        }

        fn load_import(&mut self, import_path: &str) -> Result<Arc<LoadedPackage>, BridgeError> {
            self.loads.push(import_path.to_string());
            self.packages
                .get(import_path)
                .cloned()
                .ok_or_else(|| BridgeError::resolution_error(import_path, "not found"))
        }
    }

    fn paths(doc: &ProgramDocument) -> Vec<&str> {
        doc.imports.iter().map(|p| p.path.as_str()).collect()
    }

    #[test]
    fn test_diamond_is_flattened_once() {
        let mut loader = MemoryLoader::default();
        loader.add("main", &["b", "c"], "package main\nfunc main() {}\n");
        loader.add("b", &["d"], "package b\n");
        loader.add("c", &["d"], "package c\n");
        loader.add("d", &[], "package d\n");

        let doc = assemble_program(&mut loader, Path::new("main")).unwrap();
        assert_eq!(doc.name, "main");
        assert_eq!(paths(&doc), vec!["d", "b", "c"]);
        assert_eq!(loader.loads.iter().filter(|p| *p == "d").count(), 1);
    }

    #[test]
    fn test_dependency_precedes_importer() {
        let mut loader = MemoryLoader::default();
        loader.add("main", &["b"], "package main\n");
        loader.add("b", &["a"], "package b\n");
        loader.add("a", &[], "package a\n");
        let doc = assemble_program(&mut loader, Path::new("main")).unwrap();
        assert_eq!(paths(&doc), vec!["a", "b"]);
        assert_eq!(doc.package.imports, vec!["b"]);
    }

    #[test]
    fn test_import_cycle_is_fatal() {
        let mut loader = MemoryLoader::default();
        loader.add("main", &["a"], "package main\n");
        loader.add("a", &["b"], "package a\n");
        loader.add("b", &["a"], "package b\n");
        let err = assemble_program(&mut loader, Path::new("main")).unwrap_err();
        assert_eq!(err.error_type(), "import_error");
        assert!(err.info().contains("a -> b -> a"));
    }

    #[test]
    fn test_unresolved_import_is_fatal() {
        let mut loader = MemoryLoader::default();
        loader.add("main", &["missing"], "package main\n");
        let err = assemble_program(&mut loader, Path::new("main")).unwrap_err();
        assert_eq!(err.error_type(), "import_error");
        assert!(err.info().starts_with("missing"));
    }

    #[test]
    fn test_package_document_with_initializers() {
        let mut loader = MemoryLoader::default();
        loader.add("main", &[], "package main\nvar a = b + 1\nvar b = 2\n");
        let doc = assemble_program(&mut loader, Path::new("main")).unwrap();
        let value = serde_json::to_value(&doc.package).unwrap();
        assert_eq!(value["file-paths"], serde_json::json!(["main/x.go"]));
        let inits = value["initializers"].as_array().unwrap();
        assert_eq!(inits.len(), 2);
        assert_eq!(inits[0]["type"], "initializer");
        assert_eq!(inits[0]["vars"][0]["value"]["value"], "b");
        assert_eq!(inits[1]["vars"][0]["value"]["value"], "a");
        assert_eq!(inits[1]["value"]["type"], "binary");
    }

    #[test]
    fn test_package_facts_reach_lowering() {
        let syntax = Frontend::parse_file("package p\nvar x = 1\n", "p.go").unwrap();
        let literal = match &syntax.decls[0] {
            gir_frontend::Decl::Gen(gen) => match &gen.specs[0] {
                gir_frontend::ast::Spec::Value(spec) => spec.values[0].node_id,
                _ => panic!("Expected value spec"),
            },
            _ => panic!("Expected var declaration"),
        };
        let facts = FactTable::new().with_type(literal, SemanticType::basic(BasicKind::Int));
        let package = LoadedPackage {
            name: "p".to_string(),
            path: "p".to_string(),
            imports: vec![],
            files: vec![SourceFile {
                path: "p.go".to_string(),
                syntax,
            }],
            facts: Some(Arc::new(facts)),
        };
        let doc = serde_json::to_value(lower_package(&package).unwrap()).unwrap();
        assert_eq!(doc["initializers"][0]["value"]["go-type"]["kind"], "Int");
    }

    fn package_with_facts(source: &str, facts: FactTable) -> LoadedPackage {
        let syntax = Frontend::parse_file(source, "p.go").unwrap();
        LoadedPackage {
            name: syntax.name.name.clone(),
            path: "p".to_string(),
            imports: vec![],
            files: vec![SourceFile {
                path: "p.go".to_string(),
                syntax,
            }],
            facts: Some(Arc::new(facts)),
        }
    }

    fn initialized_names(package: &LoadedPackage) -> Vec<String> {
        let doc = serde_json::to_value(lower_package(package).unwrap()).unwrap();
        doc["initializers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|init| init["vars"][0]["value"]["value"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_checker_init_order_preferred() {
        let source = "package p\nvar a = 1\nvar b = 2\n";
        let mut package = package_with_facts(source, FactTable::new());
        assert_eq!(initialized_names(&package), vec!["a", "b"]);

        let steps: Vec<Initializer> = package.files[0]
            .syntax
            .decls
            .iter()
            .rev()
            .map(|decl| match decl {
                gir_frontend::Decl::Gen(gen) => match &gen.specs[0] {
                    gir_frontend::ast::Spec::Value(spec) => Initializer {
                        vars: vec![spec.names[0].node_id],
                        value: spec.values[0].node_id,
                    },
                    _ => panic!("Expected value spec"),
                },
                _ => panic!("Expected var declaration"),
            })
            .collect();
        package.facts = Some(Arc::new(FactTable::new().with_init_order(steps)));
        assert_eq!(initialized_names(&package), vec!["b", "a"]);
    }

    #[test]
    fn test_checker_init_order_unknown_node() {
        let order = vec![Initializer { vars: vec![4242], value: 4242 }];
        let package = package_with_facts("package p\nvar a = 1\n", FactTable::new().with_init_order(order));
        let err = lower_package(&package).unwrap_err();
        assert_eq!(err.error_type(), "internal_error");
    }
}
