//! Patterns: discovered, classified components with their property schema.

use crate::identifier::PatternIdentifier;
use crate::property::{Property, PropertyMap};
use std::fmt;
use std::path::PathBuf;

/// A declaration file paired with its compiled implementation file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FilePair {
    pub directory: PathBuf,
    pub implementation_path: PathBuf,
    pub declaration_path: PathBuf,
}

/// A reusable component of a collection.
///
/// Patterns are built once per analysis pass and never modified; the next
/// pass replaces them wholesale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Pattern {
    id: PatternIdentifier,
    name: String,
    icon_path: Option<String>,
    properties: PropertyMap,
    valid: bool,
    export_name: Option<String>,
    implementation_path: Option<String>,
    declaration_path: Option<String>,
}

impl Pattern {
    pub fn new(id: PatternIdentifier, name: impl Into<String>, properties: PropertyMap) -> Self {
        Self {
            id,
            name: name.into(),
            icon_path: None,
            properties,
            valid: true,
            export_name: None,
            implementation_path: None,
            declaration_path: None,
        }
    }

    /// Attach the source files and export the pattern was built from.
    pub fn with_source(mut self, files: &FilePair, export_name: Option<&str>) -> Self {
        self.implementation_path = Some(files.implementation_path.to_string_lossy().into_owned());
        self.declaration_path = Some(files.declaration_path.to_string_lossy().into_owned());
        self.export_name = export_name.map(str::to_string);
        self
    }

    pub fn with_icon_path(mut self, icon_path: impl Into<String>) -> Self {
        self.icon_path = Some(icon_path.into());
        self
    }

    pub fn id(&self) -> &PatternIdentifier {
        &self.id
    }

    /// Human-readable name, shown instead of the id.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon_path(&self) -> Option<&str> {
        self.icon_path.as_deref()
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Look up a property by id.
    pub fn property(&self, id: &str) -> Option<&Property> {
        self.properties.get(id)
    }

    /// Whether the pattern was assembled without a fatal extraction failure.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Export name; `None` for default exports and synthetic patterns.
    pub fn export_name(&self) -> Option<&str> {
        self.export_name.as_deref()
    }

    /// The implementation file a preview renderer loads.
    pub fn implementation_path(&self) -> Option<&str> {
        self.implementation_path.as_deref()
    }

    pub fn declaration_path(&self) -> Option<&str> {
        self.declaration_path.as_deref()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
