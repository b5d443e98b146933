//! Built-in patterns that do not come from source files.

use pattern_core::{AnalysisError, Pattern, PatternIdentifier, Property, PropertyMap};

use crate::{CollectionInfo, PatternAnalyzer};

/// Yields the built-in patterns every page can use.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticAnalyzer;

impl SyntheticAnalyzer {
    pub const ID: &'static str = "synthetic";

    /// A plain text element with one optional `text` property.
    pub fn text_pattern(collection_id: &str) -> Pattern {
        let mut properties = PropertyMap::new();
        properties.insert("text".to_string(), Property::String { required: false });
        Pattern::new(
            PatternIdentifier::new(collection_id, Self::ID, "text"),
            "text",
            properties,
        )
    }
}

impl PatternAnalyzer for SyntheticAnalyzer {
    fn id(&self) -> &str {
        Self::ID
    }

    fn analyze(&mut self, collection: &CollectionInfo) -> Result<Vec<Pattern>, AnalysisError> {
        Ok(vec![Self::text_pattern(&collection.id)])
    }
}
