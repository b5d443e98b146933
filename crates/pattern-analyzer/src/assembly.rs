//! Pattern identity and assembly.

use pattern_core::{FilePair, Pattern, PatternIdentifier, PropertyMap};
use pattern_resolver::TypeContext;
use std::path::{Component, Path};

use crate::exports::Export;
use crate::properties::map_properties;
use crate::CollectionInfo;

/// Implementation file path relative to the collection root, without its
/// extension, with `/` separators.
pub fn base_identifier(root: &Path, files: &FilePair) -> String {
    let relative = files
        .implementation_path
        .strip_prefix(root)
        .unwrap_or(files.implementation_path.as_path())
        .with_extension("");

    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Base identifier, suffixed with `@<exportName>` for named exports.
pub fn pattern_id(base: &str, export_name: Option<&str>) -> String {
    match export_name {
        Some(name) => format!("{base}@{name}"),
        None => base.to_string(),
    }
}

/// Display name: the export name, else the file's base name, else (for
/// `index` files) the directory name.
pub fn pattern_name(files: &FilePair, export_name: Option<&str>) -> String {
    if let Some(name) = export_name {
        return name.to_string();
    }

    let file_name = |path: &Path| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let base = files
        .implementation_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if base == "index" {
        file_name(&files.directory)
    } else {
        base
    }
}

/// Assemble the pattern for a classified component export.
pub fn build_pattern(
    ctx: &TypeContext,
    collection: &CollectionInfo,
    analyzer_id: &str,
    files: &FilePair,
    export: &Export,
    max_object_depth: usize,
) -> Pattern {
    let root = collection.path.as_deref().unwrap_or_else(|| Path::new(""));
    let export_name = export.export_name.as_deref();

    let id = PatternIdentifier::new(
        collection.id.as_str(),
        analyzer_id,
        pattern_id(&base_identifier(root, files), export_name),
    );
    let properties = export
        .props_type()
        .map(|props| map_properties(ctx, props, max_object_depth))
        .unwrap_or_else(PropertyMap::new);

    Pattern::new(id, pattern_name(files, export_name), properties).with_source(files, export_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn pair(dir: &str, file: &str) -> FilePair {
        let directory = PathBuf::from(dir);
        FilePair {
            implementation_path: directory.join(format!("{file}.js")),
            declaration_path: directory.join(format!("{file}.d.ts")),
            directory,
        }
    }

    #[test]
    fn test_base_identifier() {
        let root = Path::new("/lib");
        assert_eq!(
            base_identifier(root, &pair("/lib/buttons/primary", "index")),
            "buttons/primary/index"
        );
        assert_eq!(base_identifier(root, &pair("/lib", "label")), "label");
        assert_eq!(
            base_identifier(root, &pair("/lib/forms", "input.field")),
            "forms/input.field"
        );
    }

    #[test]
    fn test_pattern_id() {
        assert_eq!(pattern_id("buttons/primary/index", None), "buttons/primary/index");
        assert_eq!(
            pattern_id("buttons/primary/index", Some("Button")),
            "buttons/primary/index@Button"
        );
    }

    #[test]
    fn test_pattern_name() {
        let index = pair("/lib/buttons/primary", "index");
        assert_eq!(pattern_name(&index, None), "primary");
        assert_eq!(pattern_name(&index, Some("Button")), "Button");
        assert_eq!(pattern_name(&pair("/lib/buttons", "ghost"), None), "ghost");
    }
}
