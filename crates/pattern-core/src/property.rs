//! The property schema of a pattern.

use indexmap::IndexMap;

/// Properties keyed by id, in declaration order.
pub type PropertyMap = IndexMap<String, Property>;

/// One configurable input of a pattern.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Property {
    /// Free text
    String { required: bool },
    Number { required: bool },
    /// Toggle
    Boolean { required: bool },
    /// Closed choice set
    Enum {
        options: Vec<EnumOption>,
        required: bool,
    },
    StringArray { required: bool },
    NumberArray { required: bool },
    /// Recursively typed composite
    Object { properties: PropertyMap },
}

impl Property {
    /// Whether a value must be provided. Object properties are never required.
    pub fn required(&self) -> bool {
        match self {
            Property::String { required }
            | Property::Number { required }
            | Property::Boolean { required }
            | Property::Enum { required, .. }
            | Property::StringArray { required }
            | Property::NumberArray { required } => *required,
            Property::Object { .. } => false,
        }
    }

    /// Short tag name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Property::String { .. } => "string",
            Property::Number { .. } => "number",
            Property::Boolean { .. } => "boolean",
            Property::Enum { .. } => "enum",
            Property::StringArray { .. } => "string_array",
            Property::NumberArray { .. } => "number_array",
            Property::Object { .. } => "object",
        }
    }

    /// Enum options, if this is an enum property.
    pub fn options(&self) -> Option<&[EnumOption]> {
        match self {
            Property::Enum { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Nested properties, if this is an object property.
    pub fn properties(&self) -> Option<&PropertyMap> {
        match self {
            Property::Object { properties } => Some(properties),
            _ => None,
        }
    }
}

/// One choice of an enum property.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EnumOption {
    pub id: String,
    pub display_name: String,
    pub ordinal: i64,
}

impl EnumOption {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, ordinal: i64) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            ordinal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(Property::String { required: true }.required());
        assert!(!Property::NumberArray { required: false }.required());
        assert!(!Property::Object {
            properties: PropertyMap::new()
        }
        .required());
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let mut a = PropertyMap::new();
        a.insert("label".into(), Property::String { required: true });
        a.insert("count".into(), Property::Number { required: false });

        let mut b = PropertyMap::new();
        b.insert("count".into(), Property::Number { required: false });
        b.insert("label".into(), Property::String { required: true });

        assert_eq!(a, b);
    }

    #[test]
    fn test_options_accessor() {
        let prop = Property::Enum {
            options: vec![EnumOption::new("a", "A", 0)],
            required: false,
        };
        assert_eq!(prop.options().map(|o| o.len()), Some(1));
        assert_eq!(prop.kind(), "enum");
        assert!(Property::Boolean { required: true }.options().is_none());
    }
}
