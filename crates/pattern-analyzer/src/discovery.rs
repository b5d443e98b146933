//! Module discovery: pairing declaration files with implementation files.

use pattern_core::{AnalysisError, FilePair};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::options::AnalyzerOptions;

/// Walk `root` and collect every declaration file that has a sibling
/// implementation file with the same base name.
///
/// Within each directory, files come before subdirectories and both are
/// sorted by name, so an unchanged tree always yields the same list.
pub fn discover(root: &Path, options: &AnalyzerOptions) -> Result<Vec<FilePair>, AnalysisError> {
    if !root.is_dir() {
        return Err(AnalysisError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let walker = WalkDir::new(root)
        .sort_by(files_first)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, options));

    let mut pairs = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(AnalysisError::Walk {
                    path: root.to_path_buf(),
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() {
            if let Some(pair) = pair_for(&entry, options) {
                pairs.push(pair);
            }
        }
    }

    debug!(root = %root.display(), pairs = pairs.len(), "discovered file pairs");
    Ok(pairs)
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn is_excluded(entry: &DirEntry, options: &AnalyzerOptions) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && options
            .exclude_dirs
            .iter()
            .any(|name| entry.file_name().to_string_lossy() == name.as_str())
}

fn pair_for(entry: &DirEntry, options: &AnalyzerOptions) -> Option<FilePair> {
    let file_name = entry.file_name().to_string_lossy();
    let stem = file_name.strip_suffix(options.declaration_suffix.as_str())?;
    if stem.is_empty() {
        return None;
    }

    let declaration_path = entry.path().to_path_buf();
    let implementation_path =
        declaration_path.with_file_name(format!("{stem}.{}", options.implementation_extension));
    if !implementation_path.is_file() {
        debug!(path = %declaration_path.display(), "no implementation file, skipping");
        return None;
    }

    Some(FilePair {
        directory: declaration_path.parent().map(Path::to_path_buf).unwrap_or_default(),
        implementation_path,
        declaration_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::write;
    use tempfile::TempDir;

    fn relative(root: &Path, pairs: &[FilePair]) -> Vec<String> {
        pairs
            .iter()
            .map(|p| {
                p.declaration_path
                    .strip_prefix(root)
                    .map(|r| r.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn test_pairs_and_order() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let root = temp.path();
        for rel in [
            "z.d.ts",
            "z.js",
            "a.d.ts",
            "a.js",
            "lonely.d.ts",
            "buttons/primary/index.d.ts",
            "buttons/primary/index.js",
            "buttons/index.d.ts",
            "buttons/index.js",
            "alpha/x.d.ts",
            "alpha/x.js",
            "alpha/readme.md",
        ] {
            write(root, rel, "")?;
        }

        let pairs = discover(root, &AnalyzerOptions::default())?;
        assert_eq!(
            relative(root, &pairs),
            vec![
                "a.d.ts",
                "z.d.ts",
                "alpha/x.d.ts",
                "buttons/index.d.ts",
                "buttons/primary/index.d.ts",
            ]
        );
        assert_eq!(pairs[4].implementation_path, root.join("buttons/primary/index.js"));
        assert_eq!(pairs[4].directory, root.join("buttons/primary"));

        let again = discover(root, &AnalyzerOptions::default())?;
        assert_eq!(pairs, again);
        Ok(())
    }

    #[test]
    fn test_excluded_directories() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let root = temp.path();
        write(root, "node_modules/lib/index.d.ts", "")?;
        write(root, "node_modules/lib/index.js", "")?;
        write(root, "button.d.ts", "")?;
        write(root, "button.js", "")?;

        let options = AnalyzerOptions::default().with_exclude_dir("node_modules");
        let pairs = discover(root, &options)?;
        assert_eq!(relative(root, &pairs), vec!["button.d.ts"]);
        Ok(())
    }

    #[test]
    fn test_missing_root() {
        let result = discover(Path::new("/definitely/not/here"), &AnalyzerOptions::default());
        assert!(matches!(result, Err(AnalysisError::RootNotFound { .. })));
    }
}
