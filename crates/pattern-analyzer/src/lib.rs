//! Pattern analysis for component libraries.
//!
//! An analysis pass walks a collection root, pairs each declaration file
//! with its compiled implementation, and turns every exported React
//! component into a [`Pattern`] with a property schema:
//!
//! ```text
//! discover -> TypeContext -> extract_exports -> is_react_marker -> map_properties -> build_pattern
//! ```
//!
//! # Example
//!
//! ```no_run
//! use pattern_analyzer::Collection;
//!
//! let mut collection = Collection::new("lsg", "./lib");
//! for pattern in collection.load()? {
//!     println!("{pattern}");
//! }
//! # Ok::<(), pattern_analyzer::AnalysisError>(())
//! ```

mod assembly;
mod classifier;
mod collection;
mod discovery;
mod exports;
mod options;
mod properties;
mod react;
mod synthetic;

#[cfg(test)]
mod fixtures;

pub use assembly::{base_identifier, build_pattern, pattern_id, pattern_name};
pub use classifier::{is_react_marker, MARKER_DECLARATION_FILE, MARKER_TYPES};
pub use collection::Collection;
pub use discovery::discover;
pub use exports::{extract_exports, Export, TypeInheritanceTree};
pub use options::AnalyzerOptions;
pub use properties::map_properties;
pub use react::ReactAnalyzer;
pub use synthetic::SyntheticAnalyzer;

pub use pattern_core::{AnalysisError, Pattern};

use std::path::PathBuf;

/// What an analyzer needs to know about the collection it analyzes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInfo {
    pub id: String,
    /// Root directory; `None` for collections without source files
    pub path: Option<PathBuf>,
}

/// Produces the patterns of a collection.
pub trait PatternAnalyzer: std::fmt::Debug {
    /// Analyzer id, used as the middle segment of pattern identifiers.
    fn id(&self) -> &str;

    /// Run one full pass. The result replaces the output of earlier passes.
    fn analyze(&mut self, collection: &CollectionInfo) -> Result<Vec<Pattern>, AnalysisError>;
}
