//! Analyzer configuration.

use pattern_core::AnalysisError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options for an analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerOptions {
    /// Suffix of structural declaration files
    pub declaration_suffix: String,
    /// Extension of compiled implementation files, without the dot
    pub implementation_extension: String,
    /// Directory names skipped during discovery
    pub exclude_dirs: Vec<String>,
    /// Extra directories searched for bare module specifiers
    pub type_roots: Vec<PathBuf>,
    /// Maximum length of an inheritance chain
    pub max_inheritance_depth: usize,
    /// Maximum nesting of object properties
    pub max_object_depth: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            declaration_suffix: ".d.ts".to_string(),
            implementation_extension: "js".to_string(),
            exclude_dirs: Vec::new(),
            type_roots: Vec::new(),
            max_inheritance_depth: 32,
            max_object_depth: 16,
        }
    }
}

impl AnalyzerOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| AnalysisError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AnalysisError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<(), AnalysisError> {
        if self.declaration_suffix.is_empty() {
            return Err(AnalysisError::InvalidOptions(
                "declarationSuffix must not be empty".to_string(),
            ));
        }
        if self.implementation_extension.is_empty() || self.implementation_extension.starts_with('.') {
            return Err(AnalysisError::InvalidOptions(
                "implementationExtension must be a bare extension like \"js\"".to_string(),
            ));
        }
        if self.max_inheritance_depth == 0 {
            return Err(AnalysisError::InvalidOptions(
                "maxInheritanceDepth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.exclude_dirs.push(name.into());
        self
    }

    pub fn with_type_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.type_roots.push(root.into());
        self
    }

    pub fn with_implementation_extension(mut self, extension: impl Into<String>) -> Self {
        self.implementation_extension = extension.into();
        self
    }

    pub fn with_max_inheritance_depth(mut self, depth: usize) -> Self {
        self.max_inheritance_depth = depth;
        self
    }

    pub fn with_max_object_depth(mut self, depth: usize) -> Self {
        self.max_object_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AnalyzerOptions::default();
        assert_eq!(options.declaration_suffix, ".d.ts");
        assert_eq!(options.implementation_extension, "js");
        assert_eq!(options.max_inheritance_depth, 32);
    }

    #[test]
    fn test_from_json_partial() -> Result<(), Box<dyn std::error::Error>> {
        let options = AnalyzerOptions::from_json_str(
            r#"{ "excludeDirs": ["node_modules"], "maxObjectDepth": 4 }"#,
        )?;
        assert_eq!(options.exclude_dirs, vec!["node_modules".to_string()]);
        assert_eq!(options.max_object_depth, 4);
        assert_eq!(options.implementation_extension, "js");
        Ok(())
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            AnalyzerOptions::from_json_str("{ not json"),
            Err(AnalysisError::InvalidOptions(_))
        ));
        assert!(matches!(
            AnalyzerOptions::from_json_str(r#"{ "implementationExtension": ".js" }"#),
            Err(AnalysisError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_builders() {
        let options = AnalyzerOptions::default()
            .with_exclude_dir("node_modules")
            .with_implementation_extension("mjs")
            .with_max_object_depth(2);
        assert_eq!(options.exclude_dirs.len(), 1);
        assert_eq!(options.implementation_extension, "mjs");
        assert_eq!(options.max_object_depth, 2);
    }
}
