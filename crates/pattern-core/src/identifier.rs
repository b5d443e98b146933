//! Globally unique pattern identifiers.

use crate::errors::IdentifierError;
use std::fmt;
use std::str::FromStr;

/// Identifies a pattern across collections and analyzers.
///
/// The string form is `collectionId@analyzerId:patternId`. The pattern id
/// may itself contain `@` (named exports are suffixed with `@<exportName>`),
/// so parsing splits at the first `@` and then at the first following `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternIdentifier {
    collection_id: String,
    analyzer_id: String,
    pattern_id: String,
}

impl PatternIdentifier {
    pub fn new(
        collection_id: impl Into<String>,
        analyzer_id: impl Into<String>,
        pattern_id: impl Into<String>,
    ) -> Self {
        Self {
            collection_id: collection_id.into(),
            analyzer_id: analyzer_id.into(),
            pattern_id: pattern_id.into(),
        }
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn analyzer_id(&self) -> &str {
        &self.analyzer_id
    }

    pub fn pattern_id(&self) -> &str {
        &self.pattern_id
    }

    /// The canonical string form used as a cross-system reference.
    pub fn global_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PatternIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}",
            self.collection_id, self.analyzer_id, self.pattern_id
        )
    }
}

impl FromStr for PatternIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IdentifierError::Malformed {
            input: s.to_string(),
        };

        let (collection_id, rest) = s.split_once('@').ok_or_else(malformed)?;
        let (analyzer_id, pattern_id) = rest.split_once(':').ok_or_else(malformed)?;

        Ok(Self::new(collection_id, analyzer_id, pattern_id))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PatternIdentifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PatternIdentifier {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_string_form_round_trips(
            collection in "[^@:]*",
            analyzer in "[^@:]*",
            pattern in "[^@:]*",
        ) {
            let id = PatternIdentifier::new(collection, analyzer, pattern);
            let parsed: PatternIdentifier = id.to_string().parse().unwrap();
            prop_assert_eq!(parsed, id);
        }

        #[test]
        fn prop_pattern_id_may_contain_separators(
            base in "[a-z/]{1,12}",
            export in "[A-Za-z]{1,8}",
        ) {
            let id = PatternIdentifier::new("lsg", "react", format!("{base}@{export}:x"));
            let parsed: PatternIdentifier = id.to_string().parse().unwrap();
            prop_assert_eq!(parsed.pattern_id(), id.pattern_id());
        }
    }

    #[test]
    fn test_display() {
        let id = PatternIdentifier::new("lsg", "react", "buttons/primary");
        assert_eq!(id.to_string(), "lsg@react:buttons/primary");
        assert_eq!(id.global_id(), "lsg@react:buttons/primary");
    }

    #[test]
    fn test_parse_named_export() {
        let id: PatternIdentifier = "lsg@react:buttons/primary@Button".parse().unwrap();
        assert_eq!(id.collection_id(), "lsg");
        assert_eq!(id.analyzer_id(), "react");
        assert_eq!(id.pattern_id(), "buttons/primary@Button");
    }

    #[test]
    fn test_parse_empty_segments() {
        let id: PatternIdentifier = "lsg@:text".parse().unwrap();
        assert_eq!(id.analyzer_id(), "");
        assert_eq!(id.pattern_id(), "text");
    }

    #[test]
    fn test_parse_missing_separator() {
        assert!(matches!(
            "lsg-react-button".parse::<PatternIdentifier>(),
            Err(IdentifierError::Malformed { .. })
        ));
        assert!("lsg@react".parse::<PatternIdentifier>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serializes_as_string() -> Result<(), serde_json::Error> {
        let id = PatternIdentifier::new("lsg", "react", "label@Label");
        let json = serde_json::to_string(&id)?;
        assert_eq!(json, "\"lsg@react:label@Label\"");
        let back: PatternIdentifier = serde_json::from_str(&json)?;
        assert_eq!(back, id);
        Ok(())
    }
}
