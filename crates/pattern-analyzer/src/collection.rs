//! Collections: named roots of component modules and their patterns.

use pattern_core::{AnalysisError, Pattern, PatternIdentifier};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::options::AnalyzerOptions;
use crate::react::ReactAnalyzer;
use crate::synthetic::SyntheticAnalyzer;
use crate::{CollectionInfo, PatternAnalyzer};

/// A design-system source and the patterns found in it.
#[derive(Debug)]
pub struct Collection {
    info: CollectionInfo,
    analyzers: Vec<Box<dyn PatternAnalyzer>>,
    patterns: Vec<Pattern>,
}

impl Collection {
    /// A collection rooted at `path`, analyzed for React components.
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::with_options(id, path, AnalyzerOptions::default())
    }

    pub fn with_options(id: impl Into<String>, path: impl Into<PathBuf>, options: AnalyzerOptions) -> Self {
        Self::with_analyzers(
            CollectionInfo {
                id: id.into(),
                path: Some(path.into()),
            },
            vec![Box::new(ReactAnalyzer::new(options))],
        )
    }

    /// The path-less collection of built-in patterns.
    pub fn synthetic() -> Self {
        Self::with_analyzers(
            CollectionInfo {
                id: SyntheticAnalyzer::ID.to_string(),
                path: None,
            },
            vec![Box::new(SyntheticAnalyzer)],
        )
    }

    pub fn with_analyzers(info: CollectionInfo, analyzers: Vec<Box<dyn PatternAnalyzer>>) -> Self {
        Self {
            info,
            analyzers,
            patterns: Vec::new(),
        }
    }

    pub fn add_analyzer(&mut self, analyzer: Box<dyn PatternAnalyzer>) {
        self.analyzers.push(analyzer);
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn path(&self) -> Option<&Path> {
        self.info.path.as_deref()
    }

    pub fn info(&self) -> &CollectionInfo {
        &self.info
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Replace the pattern set by running every analyzer in order.
    ///
    /// On error the collection is left without patterns.
    pub fn load(&mut self) -> Result<&[Pattern], AnalysisError> {
        self.patterns.clear();

        let mut patterns = Vec::new();
        for analyzer in &mut self.analyzers {
            patterns.extend(analyzer.analyze(&self.info)?);
        }

        info!(collection = %self.info.id, patterns = patterns.len(), "loaded collection");
        self.patterns = patterns;
        Ok(&self.patterns)
    }

    pub fn find_pattern(&self, id: &PatternIdentifier) -> Option<&Pattern> {
        self.patterns.iter().find(|pattern| pattern.id() == id)
    }

    /// Patterns whose display name contains `term`, ignoring case.
    pub fn search_patterns(&self, term: &str) -> Vec<&Pattern> {
        if term.is_empty() {
            return Vec::new();
        }
        let term = term.to_lowercase();
        self.patterns
            .iter()
            .filter(|pattern| !pattern.name().is_empty() && pattern.name().to_lowercase().contains(&term))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{install_react, write};
    use tempfile::TempDir;

    fn sample(root: &Path) -> std::io::Result<()> {
        install_react(root)?;
        for (rel, name) in [("buttons/primary", "PrimaryButton"), ("buttons/ghost", "GhostButton"), ("label", "Label")] {
            write(
                root,
                &format!("{rel}.d.ts"),
                &format!("import * as React from 'react';\nexport declare const {name}: React.SFC<{{ text: string }}>;"),
            )?;
            write(root, &format!("{rel}.js"), "")?;
        }
        Ok(())
    }

    #[test]
    fn test_load_and_search() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        sample(temp.path())?;

        let mut collection = Collection::new("lsg", temp.path());
        collection.add_analyzer(Box::new(SyntheticAnalyzer));
        let names: Vec<String> = collection.load()?.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["Label", "GhostButton", "PrimaryButton", "text"]);

        let found: Vec<&str> = collection.search_patterns("BUTTON").iter().map(|p| p.name()).collect();
        assert_eq!(found, vec!["GhostButton", "PrimaryButton"]);
        assert!(collection.search_patterns("").is_empty());
        assert!(collection.search_patterns("missing").is_empty());

        let id: PatternIdentifier = "lsg@react:label@Label".parse()?;
        assert_eq!(collection.find_pattern(&id).map(|p| p.name()), Some("Label"));
        Ok(())
    }

    #[test]
    fn test_reload_replaces_patterns() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        sample(temp.path())?;

        let mut collection = Collection::new("lsg", temp.path());
        assert_eq!(collection.load()?.len(), 3);

        std::fs::remove_file(temp.path().join("label.js"))?;
        assert_eq!(collection.load()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_failed_load_clears_patterns() -> Result<(), Box<dyn std::error::Error>> {
        let temp = TempDir::new()?;
        sample(temp.path())?;
        let root = temp.path().join("lib");
        std::fs::rename(temp.path().join("buttons"), &root)?;

        let mut collection = Collection::new("lsg", &root);
        assert!(!collection.load()?.is_empty());

        std::fs::remove_dir_all(&root)?;
        assert!(collection.load().is_err());
        assert!(collection.patterns().is_empty());
        Ok(())
    }

    #[test]
    fn test_synthetic_collection() -> Result<(), Box<dyn std::error::Error>> {
        let mut collection = Collection::synthetic();
        assert_eq!(collection.path(), None);
        let patterns = collection.load()?;
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].id().to_string(), "synthetic@synthetic:text");
        Ok(())
    }
}
