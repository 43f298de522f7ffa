//! Filesystem package loader
//!
//! Resolves import paths to package directories and parses their sources.
//! No type checker runs here, so loaded packages carry no facts.

use crate::program::{LoadedPackage, PackageLoader, SourceFile};
use gir_common::BridgeError;
use gir_frontend::ast::{File, NodeIdGenerator};
use gir_frontend::Frontend;
use log::{debug, trace};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Import path of an entry file outside any module
pub const COMMAND_LINE_PACKAGE: &str = "command-line-arguments";

/// Search roots for import resolution
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Directory holding `go.mod`; found from the entry file when unset
    pub module_root: Option<PathBuf>,
    pub gopath: Option<PathBuf>,
    pub goroot: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct Module {
    path: String,
    root: PathBuf,
}

/// The module path declared by a `go.mod` file
fn module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}

/// Whether a build constraint before the package clause excludes the file
fn build_ignored(source: &str) -> bool {
    source
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with("package"))
        .any(|line| line == "//go:build ignore" || line == "// +build ignore")
}

fn read_source(path: &Path) -> Result<String, BridgeError> {
    fs::read_to_string(path)
        .map_err(|err| BridgeError::path_error(format!("{}: {}", path.display(), err)))
}

/// Sorted import paths of `files`, cgo's pseudo-package excluded
fn import_set<'a>(files: impl IntoIterator<Item = &'a File>) -> Vec<String> {
    files
        .into_iter()
        .flat_map(File::import_paths)
        .filter(|path| path != "C")
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub struct SourceLoader {
    config: LoaderConfig,
    module: Option<Module>,
    packages: HashMap<String, Arc<LoadedPackage>>,
}

impl SourceLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            module: None,
            packages: HashMap::new(),
        }
    }

    /// Nearest directory at or above `start` holding a `go.mod`
    pub fn find_module_root(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join("go.mod").is_file())
            .map(Path::to_path_buf)
    }

    /// Read the module's `go.mod` once, from the configured root or else
    /// the nearest ancestor of `start`.
    fn open_module(&mut self, start: Option<&Path>) -> Result<(), BridgeError> {
        if self.module.is_some() {
            return Ok(());
        }
        let root = match &self.config.module_root {
            Some(root) => Some(root.clone()),
            None => start.and_then(Self::find_module_root),
        };
        let root = match root {
            Some(root) => root,
            None => return Ok(()),
        };
        let go_mod = root.join("go.mod");
        if !go_mod.is_file() {
            return Ok(());
        }
        let path = module_path(&read_source(&go_mod)?).ok_or_else(|| {
            BridgeError::path_error(format!("{}: no module directive", go_mod.display()))
        })?;
        debug!("module {} at {}", path, root.display());
        self.module = Some(Module { path, root });
        Ok(())
    }

    /// Import path of the package in directory `dir`
    fn import_path_of(&self, dir: &Path) -> String {
        let module = match &self.module {
            Some(module) => module,
            None => return COMMAND_LINE_PACKAGE.to_string(),
        };
        let root = module.root.canonicalize().unwrap_or_else(|_| module.root.clone());
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        match dir.strip_prefix(&root) {
            Ok(rest) if rest.as_os_str().is_empty() => module.path.clone(),
            Ok(rest) => {
                let segments: Vec<_> = rest.components().map(|c| c.as_os_str().to_string_lossy()).collect();
                format!("{}/{}", module.path, segments.join("/"))
            }
            Err(_) => COMMAND_LINE_PACKAGE.to_string(),
        }
    }

    /// Candidate directories for `import_path`, in search order
    fn candidates(&self, import_path: &str) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(module) = &self.module {
            if import_path == module.path {
                dirs.push(module.root.clone());
            } else if let Some(rest) = import_path.strip_prefix(&format!("{}/", module.path)) {
                dirs.push(module.root.join(rest));
            }
        }
        for root in [&self.config.gopath, &self.config.goroot].into_iter().flatten() {
            dirs.push(root.join("src").join(import_path));
        }
        dirs
    }

    fn resolve_dir(&self, import_path: &str) -> Result<PathBuf, BridgeError> {
        let candidates = self.candidates(import_path);
        candidates
            .iter()
            .find(|dir| dir.is_dir())
            .cloned()
            .ok_or_else(|| {
                let searched: Vec<_> = candidates.iter().map(|d| d.display().to_string()).collect();
                BridgeError::resolution_error(
                    import_path,
                    format!("cannot find package (searched: {})", searched.join(", ")),
                )
            })
    }

    /// Package source files of `dir`, sorted by name
    fn package_files(dir: &Path) -> Result<Vec<PathBuf>, BridgeError> {
        let entries = fs::read_dir(dir)
            .map_err(|err| BridgeError::path_error(format!("{}: {}", dir.display(), err)))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if path.is_file() && name.ends_with(".go") && !name.ends_with("_test.go") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn load_dir(&self, import_path: &str, dir: &Path) -> Result<LoadedPackage, BridgeError> {
        let mut node_ids = NodeIdGenerator::new();
        let mut files = Vec::new();
        for path in Self::package_files(dir)? {
            let source = read_source(&path)?;
            if build_ignored(&source) {
                trace!("skipping {} (build ignore)", path.display());
                continue;
            }
            let display = path.display().to_string();
            let syntax = Frontend::parse_file_with_ids(&source, &display, &mut node_ids)?;
            files.push(SourceFile {
                path: display,
                syntax,
            });
        }

        let name = match files.first() {
            Some(file) => file.syntax.name.name.clone(),
            None => {
                return Err(BridgeError::resolution_error(
                    import_path,
                    format!("no Go files in {}", dir.display()),
                ))
            }
        };
        if let Some(other) = files.iter().find(|f| f.syntax.name.name != name) {
            return Err(BridgeError::resolution_error(
                import_path,
                format!(
                    "found packages {} and {} in {}",
                    name,
                    other.syntax.name.name,
                    dir.display()
                ),
            ));
        }

        Ok(LoadedPackage {
            name,
            path: import_path.to_string(),
            imports: import_set(files.iter().map(|f| &f.syntax)),
            files,
            facts: None,
        })
    }
}

impl PackageLoader for SourceLoader {
    fn load_entry(&mut self, path: &Path) -> Result<Arc<LoadedPackage>, BridgeError> {
        let source = read_source(path)?;
        let entry_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        self.open_module(Some(&entry_dir))?;

        let display = path.display().to_string();
        let syntax = Frontend::parse_file(&source, &display)?;
        let package = LoadedPackage {
            name: syntax.name.name.clone(),
            path: self.import_path_of(&entry_dir),
            imports: import_set([&syntax]),
            files: vec![SourceFile {
                path: display,
                syntax,
            }],
            facts: None,
        };
        debug!("entry package {} ({})", package.name, package.path);
        Ok(Arc::new(package))
    }

    fn load_import(&mut self, import_path: &str) -> Result<Arc<LoadedPackage>, BridgeError> {
        if let Some(package) = self.packages.get(import_path) {
            return Ok(Arc::clone(package));
        }
        self.open_module(None)?;
        let dir = self.resolve_dir(import_path)?;
        debug!("resolved {} to {}", import_path, dir.display());
        let package = Arc::new(self.load_dir(import_path, &dir)?);
        self.packages.insert(import_path.to_string(), Arc::clone(&package));
        Ok(package)
    }
}
