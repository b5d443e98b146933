//! Loading declaration files and resolving module specifiers.
//!
//! Files are read and parsed breadth-first starting from the requested
//! paths. Every `import`/`export ... from` specifier that resolves to a
//! declaration file on disk is queued as well.

use indexmap::{IndexMap, IndexSet};
use pattern_core::ast::{Module, NamespaceName, Statement};
use pattern_core::ParseError;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

const DECLARATION_SUFFIX: &str = ".d.ts";

/// Why a file could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LoadFailure {
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
    Parse(ParseError),
}

/// A successfully parsed file together with its resolved imports.
#[derive(Debug)]
pub(crate) struct LoadedFile {
    pub path: PathBuf,
    pub module: Module,
    /// Specifier -> resolved declaration file
    pub imports: IndexMap<String, PathBuf>,
}

/// Result of loading a file set.
#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    pub files: Vec<LoadedFile>,
    pub failures: IndexMap<PathBuf, LoadFailure>,
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}

/// Load `roots` and everything they import.
pub(crate) fn load_all(roots: &[PathBuf], type_roots: &[PathBuf]) -> LoadResult {
    let mut result = LoadResult::default();
    let mut seen: IndexSet<PathBuf> = IndexSet::new();
    let mut queue: VecDeque<PathBuf> = VecDeque::new();

    for root in roots {
        let path = normalize(root);
        if seen.insert(path.clone()) {
            queue.push_back(path);
        }
    }

    while let Some(path) = queue.pop_front() {
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read declaration file");
                result.failures.insert(
                    path,
                    LoadFailure::Io {
                        kind: err.kind(),
                        message: err.to_string(),
                    },
                );
                continue;
            }
        };

        let module = match pattern_parser::parse_module(&source) {
            Ok(module) => module,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to parse declaration file");
                result.failures.insert(path, LoadFailure::Parse(err));
                continue;
            }
        };

        let mut imports = IndexMap::new();
        for specifier in module_specifiers(&module.statements) {
            if imports.contains_key(&specifier) {
                continue;
            }
            match resolve_specifier(&path, &specifier, type_roots) {
                Some(target) => {
                    if seen.insert(target.clone()) {
                        queue.push_back(target.clone());
                    }
                    imports.insert(specifier, target);
                }
                None => debug!(path = %path.display(), %specifier, "unresolved module specifier"),
            }
        }

        debug!(path = %path.display(), statements = module.statements.len(), "loaded declaration file");
        result.files.push(LoadedFile {
            path,
            module,
            imports,
        });
    }

    result
}

/// Every module specifier referenced by a file, including those inside
/// namespace and ambient module blocks.
fn module_specifiers(statements: &[Statement]) -> Vec<String> {
    let mut specifiers = Vec::new();
    for statement in statements {
        match statement {
            Statement::Import(import) => specifiers.push(import.specifier.clone()),
            Statement::ExportNamed(export) => specifiers.extend(export.from.clone()),
            Statement::ExportAll(export) => specifiers.push(export.from.clone()),
            Statement::Namespace(ns) => {
                // module augmentations name their target
                if let NamespaceName::Module(name) = &ns.name {
                    if name.starts_with('.') {
                        specifiers.push(name.clone());
                    }
                }
                specifiers.extend(module_specifiers(&ns.body));
            }
            _ => {}
        }
    }
    specifiers.retain(|s| !s.is_empty());
    specifiers
}

/// Resolve a module specifier as seen from `from` to a declaration file.
pub fn resolve_specifier(from: &Path, specifier: &str, type_roots: &[PathBuf]) -> Option<PathBuf> {
    let dir = from.parent().unwrap_or_else(|| Path::new(""));

    if specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".." {
        return resolve_file_or_directory(&dir.join(specifier));
    }
    if Path::new(specifier).is_absolute() {
        return resolve_file_or_directory(Path::new(specifier));
    }

    let (package, subpath) = split_package(specifier);
    let types_name = match package.strip_prefix('@') {
        Some(scoped) => scoped.replace('/', "__"),
        None => package.to_string(),
    };

    for ancestor in dir.ancestors() {
        let node_modules = ancestor.join("node_modules");
        let candidates = [
            node_modules.join(package),
            node_modules.join("@types").join(&types_name),
        ];
        for candidate in candidates {
            if let Some(found) = resolve_in_package(&candidate, subpath) {
                return Some(found);
            }
        }
    }

    type_roots
        .iter()
        .find_map(|root| resolve_in_package(&root.join(&types_name), subpath))
}

/// Split `@scope/name/sub/path` into `(@scope/name, sub/path)`.
fn split_package(specifier: &str) -> (&str, &str) {
    let segments = if specifier.starts_with('@') { 2 } else { 1 };
    let mut end = 0;
    for (count, (i, _)) in specifier.match_indices('/').enumerate() {
        if count + 1 == segments {
            end = i;
            break;
        }
    }
    if end == 0 {
        (specifier, "")
    } else {
        (&specifier[..end], &specifier[end + 1..])
    }
}

fn resolve_in_package(package: &Path, subpath: &str) -> Option<PathBuf> {
    if !package.is_dir() {
        return None;
    }
    if !subpath.is_empty() {
        return resolve_file_or_directory(&package.join(subpath));
    }
    if let Some(types) = package_types_entry(package) {
        if let Some(found) = resolve_file_or_directory(&package.join(types)) {
            return Some(found);
        }
    }
    existing(package.join("index.d.ts"))
}

/// The `types` (or `typings`) entry of a package manifest.
fn package_types_entry(package: &Path) -> Option<String> {
    let manifest = std::fs::read_to_string(package.join("package.json")).ok()?;
    let value: serde_json::Value = serde_json::from_str(&manifest).ok()?;
    ["types", "typings"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
}

fn resolve_file_or_directory(base: &Path) -> Option<PathBuf> {
    let base = normalize(base);
    let text = base.to_string_lossy();

    if text.ends_with(DECLARATION_SUFFIX) {
        return existing(base);
    }
    if let Some(stem) = text.strip_suffix(".js") {
        if let Some(found) = existing(PathBuf::from(format!("{stem}{DECLARATION_SUFFIX}"))) {
            return Some(found);
        }
    }

    existing(with_suffix(&base, DECLARATION_SUFFIX))
        .or_else(|| existing(base.join("index.d.ts")))
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}
