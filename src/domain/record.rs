//! Record and record-key types.
//!
//! A [`Record`] is one row of domain data (a user, ticket, invoice, event or
//! newsletter subscription) as delivered by the backend. The engine treats it
//! as an opaque JSON object and only looks inside through the field paths a
//! screen declares.

use super::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Stable identifier of a record, read from the configured key field.
///
/// Backends hand out both string ids (`"65f0c1..."`) and integer ids; both are
/// normalized to their string form so that `1` and `"1"` name the same row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds a key from a JSON value. Only strings and numbers are keys.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for RecordKey {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for RecordKey {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// One row of tabular data.
///
/// Field lookups accept dotted paths (`user_id.name`) to reach into nested
/// objects. A key that literally contains a dot wins over path traversal.
/// JSON `null` is reported as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts a JSON value into a record.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRecord`] if the value is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(GridError::InvalidRecord(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Sets a top-level field, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Looks up a field by name or dotted path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(path) {
            return present(value);
        }

        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        present(current)
    }

    /// Reads the record's key from `key_field`.
    #[must_use]
    pub fn key(&self, key_field: &str) -> Option<RecordKey> {
        self.get(key_field).and_then(RecordKey::from_value)
    }

    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = GridError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

/// Parses a record-source payload: a JSON array of objects.
///
/// # Errors
///
/// Returns [`GridError::Json`] for malformed JSON and
/// [`GridError::InvalidRecord`] if the document is not an array of objects.
///
/// # Example
///
/// ```
/// use admingrid::domain::records_from_json;
///
/// let records = records_from_json(r#"[{"id": 1, "name": "Alice"}]"#)?;
/// assert_eq!(records.len(), 1);
/// # Ok::<(), admingrid::GridError>(())
/// ```
pub fn records_from_json(payload: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Array(items) = value else {
        return Err(GridError::InvalidRecord(format!(
            "expected a JSON array, found {}",
            json_kind(&value)
        )));
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Record::from_value(item).map_err(|e| match e {
                GridError::InvalidRecord(msg) => {
                    GridError::InvalidRecord(format!("element {index}: {msg}"))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(record_count = records.len(), "decoded record payload");
    Ok(records)
}

fn present(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        other => Some(other),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice() -> Record {
        Record::from_value(json!({
            "_id": "inv-1",
            "amount": "1200",
            "user_id": { "name": "Asha", "email": "asha@example.com" },
            "note": null
        }))
        .unwrap()
    }

    #[test]
    fn get_traverses_dotted_paths() {
        let record = invoice();
        assert_eq!(record.get("user_id.name"), Some(&json!("Asha")));
        assert_eq!(record.get("user_id.phone"), None);
        assert_eq!(record.get("amount.value"), None);
    }

    #[test]
    fn literal_dotted_key_wins_over_traversal() {
        let record = Record::new()
            .with("a.b", "literal")
            .with("a", json!({ "b": "nested" }));
        assert_eq!(record.get("a.b"), Some(&json!("literal")));
    }

    #[test]
    fn null_reads_as_absent() {
        assert_eq!(invoice().get("note"), None);
    }

    #[test]
    fn numeric_and_string_keys_normalize() {
        let numeric = Record::new().with("id", 7);
        let text = Record::new().with("id", "7");
        assert_eq!(numeric.key("id"), text.key("id"));
        assert_eq!(numeric.key("id"), Some(RecordKey::from(7_i64)));
        assert_eq!(Record::new().with("id", true).key("id"), None);
    }

    #[test]
    fn payload_must_be_array_of_objects() {
        assert!(matches!(
            records_from_json(r#"{"id": 1}"#),
            Err(GridError::InvalidRecord(_))
        ));

        let err = records_from_json(r#"[{"id": 1}, 2]"#).unwrap_err();
        assert!(matches!(err, GridError::InvalidRecord(msg) if msg.starts_with("element 1")));

        assert!(matches!(records_from_json("[{"), Err(GridError::Json(_))));
    }
}
