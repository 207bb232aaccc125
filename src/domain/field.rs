//! Typed field descriptors.
//!
//! Screens declare the fields they filter and sort on together with a value
//! type, so the comparison used for a column is fixed by configuration rather
//! than guessed from whatever values happen to be in the records.

use super::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared value type of a record field.
///
/// Deserializes from the strings `"string"`, `"number"` and `"date"`
/// (case-insensitive). Any other name is a configuration error, so a typo in
/// a screen's TOML fails when the engine is built instead of silently falling
/// back to text comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// Compared lexicographically.
    String,
    /// Compared numerically. Numeric strings such as `"1200"` are accepted.
    Number,
    /// Compared chronologically.
    Date,
}

impl FieldType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            other => Err(GridError::Config(format!("unknown field type `{other}`"))),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

/// A field name (or dotted path) paired with its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldSpec {
    #[must_use]
    pub fn new(field: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: field.into(),
            field_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_types_case_insensitively() {
        assert_eq!("Date".parse::<FieldType>().unwrap(), FieldType::Date);
        assert_eq!(" number ".parse::<FieldType>().unwrap(), FieldType::Number);
        assert_eq!("string".parse::<FieldType>().unwrap(), FieldType::String);
    }

    #[test]
    fn rejects_unknown_type() {
        let err = "currency".parse::<FieldType>().unwrap_err();
        assert!(matches!(err, GridError::Config(msg) if msg.contains("currency")));
    }

    #[test]
    fn field_spec_deserializes_type_key() {
        let spec: FieldSpec = toml::from_str("field = \"amount\"\ntype = \"number\"").unwrap();
        assert_eq!(spec, FieldSpec::new("amount", FieldType::Number));
    }
}
