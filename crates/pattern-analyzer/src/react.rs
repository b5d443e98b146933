//! The React component analyzer.

use pattern_core::{AnalysisError, Pattern};
use pattern_resolver::{ResolverOptions, TypeContext};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::assembly::build_pattern;
use crate::classifier::is_react_marker;
use crate::discovery::discover;
use crate::exports::{extract_exports, Export};
use crate::options::AnalyzerOptions;
use crate::{CollectionInfo, PatternAnalyzer};

/// Finds React components in a collection of compiled modules.
///
/// Every pass rebuilds the type analysis context from the files discovered
/// in that pass; the previous context is dropped first.
#[derive(Debug, Default)]
pub struct ReactAnalyzer {
    options: AnalyzerOptions,
    context: Option<TypeContext>,
}

impl ReactAnalyzer {
    pub const ID: &'static str = "react";

    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            options,
            context: None,
        }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Context of the most recent pass.
    pub fn context(&self) -> Option<&TypeContext> {
        self.context.as_ref()
    }

    /// Exports of one declaration file, as seen by the most recent pass.
    pub fn exports_of(&self, declaration_path: &Path) -> Result<Vec<Export>, AnalysisError> {
        let Some(ctx) = self.context.as_ref() else {
            return Ok(Vec::new());
        };
        let file = ctx.file(declaration_path)?;
        Ok(extract_exports(
            ctx,
            file,
            |ty| is_react_marker(ctx, ty),
            self.options.max_inheritance_depth,
        ))
    }

    fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            type_roots: self.options.type_roots.clone(),
            max_inheritance_depth: self.options.max_inheritance_depth,
            ..ResolverOptions::default()
        }
    }
}

impl PatternAnalyzer for ReactAnalyzer {
    fn id(&self) -> &str {
        Self::ID
    }

    fn analyze(&mut self, collection: &CollectionInfo) -> Result<Vec<Pattern>, AnalysisError> {
        let Some(root) = collection.path.as_deref() else {
            warn!(collection = %collection.id, "collection has no root directory");
            return Ok(Vec::new());
        };
        info!(collection = %collection.id, root = %root.display(), "starting react analysis");

        let pairs = discover(root, &self.options)?;
        let declaration_files: Vec<PathBuf> = pairs.iter().map(|p| p.declaration_path.clone()).collect();

        self.context = None;
        let resolver_options = self.resolver_options();
        let ctx: &TypeContext = self
            .context
            .insert(TypeContext::build(&declaration_files, resolver_options));

        let mut patterns = Vec::new();
        for pair in &pairs {
            let file = match ctx.file(&pair.declaration_path) {
                Ok(file) => file,
                Err(err) => {
                    warn!(error = %err, "skipping declaration file");
                    continue;
                }
            };

            let exports = extract_exports(
                ctx,
                file,
                |ty| is_react_marker(ctx, ty),
                self.options.max_inheritance_depth,
            );
            for export in exports {
                if !export.is_component() {
                    debug!(
                        path = %pair.declaration_path.display(),
                        export = ?export.export_name,
                        "export is not a component"
                    );
                    continue;
                }
                patterns.push(build_pattern(
                    ctx,
                    collection,
                    Self::ID,
                    pair,
                    &export,
                    self.options.max_object_depth,
                ));
            }
        }

        info!(
            collection = %collection.id,
            files = pairs.len(),
            patterns = patterns.len(),
            "finished react analysis"
        );
        Ok(patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{install_react, write};
    use pattern_core::{EnumOption, Property, PropertyMap};
    use tempfile::TempDir;

    fn collection(root: &Path) -> CollectionInfo {
        CollectionInfo {
            id: "lsg".to_string(),
            path: Some(root.to_path_buf()),
        }
    }

    fn component(root: &Path, rel: &str, declarations: &str) -> std::io::Result<()> {
        write(root, &format!("{rel}.d.ts"), declarations)?;
        write(root, &format!("{rel}.js"), "")?;
        Ok(())
    }

    #[test]
    fn test_default_export_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let root = temp.path();
        install_react(root)?;
        component(
            root,
            "buttons/primary/index",
            "import * as React from 'react';\n\
             export interface PrimaryProps {\n\
                 label: string;\n\
                 variant?: 'a' | 'b';\n\
             }\n\
             declare const Primary: React.SFC<PrimaryProps>;\n\
             export default Primary;\n",
        )?;

        let mut analyzer = ReactAnalyzer::default();
        let patterns = analyzer.analyze(&collection(root))?;
        assert_eq!(patterns.len(), 1);

        let pattern = &patterns[0];
        assert_eq!(pattern.id().to_string(), "lsg@react:buttons/primary/index");
        assert_eq!(pattern.name(), "primary");
        assert!(pattern.is_valid());
        assert_eq!(pattern.export_name(), None);

        let mut expected = PropertyMap::new();
        expected.insert("label".into(), Property::String { required: true });
        expected.insert(
            "variant".into(),
            Property::Enum {
                options: vec![EnumOption::new("a", "a", 0), EnumOption::new("b", "b", 1)],
                required: false,
            },
        );
        assert_eq!(pattern.properties(), &expected);
        Ok(())
    }

    #[test]
    fn test_compiled_default_export() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let root = temp.path();
        install_react(root)?;
        component(
            root,
            "chip/index",
            "import * as React from 'react';\n\
             export interface ChipProps {\n\
                 label: string;\n\
                 _internal?: number;\n\
             }\n\
             declare const _default: React.SFC<ChipProps>;\n\
             export default _default;\n",
        )?;

        let mut analyzer = ReactAnalyzer::default();
        let patterns = analyzer.analyze(&collection(root))?;
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].id().to_string(), "lsg@react:chip/index");
        assert_eq!(patterns[0].export_name(), None);
        assert_eq!(
            patterns[0].property("label"),
            Some(&Property::String { required: true })
        );
        assert_eq!(
            patterns[0].property("_internal"),
            Some(&Property::Number { required: false })
        );
        Ok(())
    }

    #[test]
    fn test_component_shapes() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let root = temp.path();
        install_react(root)?;
        component(
            root,
            "widgets",
            "import * as React from 'react';\n\
             export interface Props { title: string }\n\
             export declare class Card extends React.Component<Props, {}> {}\n\
             export declare class Fancy extends React.PureComponent<Props> {}\n\
             export declare const Connected: React.ComponentClass<Props>;\n\
             export declare const Styled: React.SFC<Props> & { extra: string };\n\
             export declare const Bare: React.SFC;\n\
             export declare const version: string;\n\
             export declare class Helper {}\n",
        )?;

        let mut analyzer = ReactAnalyzer::default();
        let patterns = analyzer.analyze(&collection(root))?;
        let ids: Vec<String> = patterns.iter().map(|p| p.id().pattern_id().to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "widgets@Card",
                "widgets@Fancy",
                "widgets@Connected",
                "widgets@Styled",
                "widgets@Bare",
            ]
        );
        for pattern in &patterns[..4] {
            assert_eq!(pattern.property("title"), Some(&Property::String { required: true }));
        }
        assert!(patterns[4].properties().is_empty());
        Ok(())
    }

    #[test]
    fn test_marker_one_hop_away() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let root = temp.path();
        install_react(root)?;
        let path = root.join("card.d.ts");
        component(
            root,
            "card",
            "import * as React from 'react';\nexport declare class Card extends React.Component<{}, {}> {}",
        )?;

        let mut analyzer = ReactAnalyzer::default();
        assert_eq!(analyzer.analyze(&collection(root))?.len(), 1);

        let exports = analyzer.exports_of(&path)?;
        let tree = &exports[0].export_type;
        assert!(!tree.resolution_aborted);
        assert_eq!(tree.base_types[0].type_name.as_deref(), Some("Component"));
        assert!(tree.base_types[0].resolution_aborted);
        Ok(())
    }

    #[test]
    fn test_lookalike_is_not_a_component() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let root = temp.path();
        component(
            root,
            "fake",
            "declare class Component<P> { props: P }\n\
             export declare class NotReact extends Component<{ a: string }> {}",
        )?;

        let mut analyzer = ReactAnalyzer::default();
        assert!(analyzer.analyze(&collection(root))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_broken_file_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let root = temp.path();
        install_react(root)?;
        component(root, "a/broken", "export interface Props { label: string")?;
        component(
            root,
            "b/good",
            "import * as React from 'react';\nexport declare const Good: React.SFC<{}>;",
        )?;

        let mut analyzer = ReactAnalyzer::default();
        let patterns = analyzer.analyze(&collection(root))?;
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].name(), "Good");
        assert!(matches!(
            analyzer.exports_of(&root.join("a/broken.d.ts")),
            Err(AnalysisError::Context(_))
        ));
        Ok(())
    }

    #[test]
    fn test_reanalysis_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        let root = temp.path();
        install_react(root)?;
        for name in ["one", "two", "three"] {
            component(
                root,
                &format!("{name}/index"),
                "import * as React from 'react';\n\
                 export declare enum Size { S, M }\n\
                 export interface Props { size?: Size; tags: string[] }\n\
                 export declare const View: React.SFC<Props>;",
            )?;
        }

        let mut analyzer = ReactAnalyzer::default();
        let first = analyzer.analyze(&collection(root))?;
        let second = analyzer.analyze(&collection(root))?;
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_missing_root() {
        let mut analyzer = ReactAnalyzer::default();
        let result = analyzer.analyze(&collection(Path::new("/no/such/collection")));
        assert!(matches!(result, Err(AnalysisError::RootNotFound { .. })));
    }
}
