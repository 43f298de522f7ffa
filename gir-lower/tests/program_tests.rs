//! Whole-program assembly over real directory trees

use gir_lower::program::flatten_imports;
use gir_lower::{assemble_program, LoaderConfig, PackageLoader, SourceLoader};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn module_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "go.mod", "module example.com/app\n\ngo 1.21\n");
    write(
        root,
        "main.go",
        indoc! {r#"
            package main

            import (
                "example.com/app/b"
                "example.com/app/c"
            )

            func main() {
                b.Run()
                c.Run()
            }
        "#},
    );
    write(
        root,
        "b/b.go",
        "package b\n\nimport \"example.com/app/a\"\n\nfunc Run() { a.Do() }\n",
    );
    write(
        root,
        "c/c.go",
        "package c\n\nimport \"example.com/app/a\"\n\nfunc Run() { a.Do() }\n",
    );
    write(root, "a/a.go", "package a\n\nvar count = start + 1\n\nvar start = 41\n\nfunc Do() {}\n");
    write(root, "a/a_test.go", "package a\n\nimport \"testing\"\n");
    write(
        root,
        "a/gen.go",
        "//go:build ignore\n\npackage main\n\nimport \"os\"\n",
    );
    dir
}

fn loader_for(root: &Path) -> SourceLoader {
    SourceLoader::new(LoaderConfig {
        module_root: Some(root.to_path_buf()),
        ..LoaderConfig::default()
    })
}

#[test]
fn test_dependency_order_and_dedup() {
    let dir = module_tree();
    let mut loader = loader_for(dir.path());
    let doc = assemble_program(&mut loader, &dir.path().join("main.go")).unwrap();

    assert_eq!(doc.name, "main");
    let paths: Vec<_> = doc.imports.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["example.com/app/a", "example.com/app/b", "example.com/app/c"]
    );
    assert_eq!(doc.package.path, "example.com/app");
    assert_eq!(
        doc.package.imports,
        vec!["example.com/app/b", "example.com/app/c"]
    );
    assert_eq!(
        doc.package.file_paths,
        vec![dir.path().join("main.go").display().to_string()]
    );
}

#[test]
fn test_package_contents() {
    let dir = module_tree();
    let mut loader = loader_for(dir.path());
    let doc = assemble_program(&mut loader, &dir.path().join("main.go")).unwrap();

    let a = &doc.imports[0];
    assert_eq!(a.name, "a");
    assert_eq!(a.files.len(), 1);
    assert!(a.file_paths[0].ends_with("a.go"));
    assert!(a.imports.is_empty());

    let value = serde_json::to_value(a).unwrap();
    let inits = value["initializers"].as_array().unwrap();
    assert_eq!(inits[0]["vars"][0]["value"]["value"], "start");
    assert_eq!(inits[1]["vars"][0]["value"]["value"], "count");

    let b = serde_json::to_value(&doc.imports[1]).unwrap();
    assert_eq!(b["files"][0]["imports"][0]["specs"][0]["path"], "example.com/app/a");
}

#[test]
fn test_gopath_fallback() {
    let module = tempfile::tempdir().unwrap();
    let gopath = tempfile::tempdir().unwrap();
    write(module.path(), "go.mod", "module example.com/tool\n");
    write(
        module.path(),
        "main.go",
        "package main\n\nimport \"vendor.org/lib\"\n\nvar x = lib.X\n",
    );
    write(gopath.path(), "src/vendor.org/lib/lib.go", "package lib\n\nconst X = 1\n");

    let mut loader = SourceLoader::new(LoaderConfig {
        module_root: Some(module.path().to_path_buf()),
        gopath: Some(gopath.path().to_path_buf()),
        goroot: None,
    });
    let doc = assemble_program(&mut loader, &module.path().join("main.go")).unwrap();
    assert_eq!(doc.imports.len(), 1);
    assert_eq!(doc.imports[0].name, "lib");
    assert_eq!(doc.package.initializers.len(), 1);
}

#[test]
fn test_unresolvable_import() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "go.mod", "module m\n");
    write(dir.path(), "main.go", "package main\n\nimport \"nowhere/pkg\"\n");
    let mut loader = loader_for(dir.path());
    let err = assemble_program(&mut loader, &dir.path().join("main.go")).unwrap_err();
    assert_eq!(err.error_type(), "import_error");
    assert!(err.info().starts_with("nowhere/pkg"));
}

#[test]
fn test_import_cycle() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "go.mod", "module m\n");
    write(dir.path(), "main.go", "package main\n\nimport \"m/x\"\n");
    write(dir.path(), "x/x.go", "package x\n\nimport \"m/y\"\n");
    write(dir.path(), "y/y.go", "package y\n\nimport \"m/x\"\n");
    let mut loader = loader_for(dir.path());
    let err = assemble_program(&mut loader, &dir.path().join("main.go")).unwrap_err();
    assert_eq!(err.error_type(), "import_error");
    assert!(err.info().contains("import cycle"));
}

#[test]
fn test_mixed_package_names() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "go.mod", "module m\n");
    write(dir.path(), "p/one.go", "package p\n");
    write(dir.path(), "p/two.go", "package q\n");
    let mut loader = loader_for(dir.path());
    let err = loader.load_import("m/p").unwrap_err();
    assert_eq!(err.error_type(), "import_error");
    assert!(err.info().contains("found packages p and q"));
}

#[test]
fn test_entry_outside_module() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "solo.go", "package main\n\nfunc main() {}\n");
    let mut loader = SourceLoader::new(LoaderConfig::default());
    let doc = assemble_program(&mut loader, &dir.path().join("solo.go")).unwrap();
    assert_eq!(doc.package.path, "command-line-arguments");
    assert!(doc.imports.is_empty());
}

#[test]
fn test_missing_entry_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut loader = SourceLoader::new(LoaderConfig::default());
    let err = assemble_program(&mut loader, &dir.path().join("absent.go")).unwrap_err();
    assert_eq!(err.error_type(), "path_error");
    assert_eq!(err.position(), gir_common::SourcePosition::toplevel());
}

#[test]
fn test_node_ids_unique_within_package() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "go.mod", "module m\n");
    write(dir.path(), "p/a.go", "package p\n\nvar a = 1\n");
    write(dir.path(), "p/b.go", "package p\n\nvar b = 2\n");
    let mut loader = loader_for(dir.path());
    let package = loader.load_import("m/p").unwrap();
    let ids: Vec<_> = package
        .files
        .iter()
        .map(|f| f.syntax.name.node_id)
        .collect();
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_module_import_on_fresh_loader() {
    let dir = module_tree();
    let mut loader = loader_for(dir.path());
    let b = loader.load_import("example.com/app/b").unwrap();
    assert_eq!(b.name, "b");
    assert_eq!(b.imports, vec!["example.com/app/a"]);
    let again = loader.load_import("example.com/app/b").unwrap();
    assert!(std::sync::Arc::ptr_eq(&b, &again));
}

#[test]
fn test_import_cycle_without_entry() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "go.mod", "module m\n");
    write(dir.path(), "x/x.go", "package x\n\nimport \"m/y\"\n");
    write(dir.path(), "y/y.go", "package y\n\nimport \"m/x\"\n");
    let mut loader = loader_for(dir.path());
    let err = flatten_imports(&mut loader, "m", &["m/x".to_string()]).unwrap_err();
    assert_eq!(err.error_type(), "import_error");
    assert!(err.info().ends_with("import cycle: m -> m/x -> m/y -> m/x"));
}

#[test]
fn test_flatten_on_fresh_loader() {
    let dir = module_tree();
    let mut loader = loader_for(dir.path());
    let roots = vec!["example.com/app/c".to_string(), "example.com/app/b".to_string()];
    let order = flatten_imports(&mut loader, "example.com/app", &roots).unwrap();
    let paths: Vec<_> = order.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["example.com/app/a", "example.com/app/b", "example.com/app/c"]
    );
}
