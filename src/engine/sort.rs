//! Single-key, type-aware, stable sorting.
//!
//! The comparison for a column comes from its declared [`FieldType`]. Values
//! that are absent or cannot be read as that type sort lowest; descending
//! order is the exact reverse, so they end up last there.
//!
//! Text compares case-insensitively (`"alice"` before `"Bob"`), with the raw
//! strings breaking ties so the order stays total.

use crate::domain::{FieldType, Record};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }
}

/// The active sort: one field and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }
}

/// A field value read under its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Missing,
    Text { folded: String, raw: String },
    Number(f64),
    Date(DateTime<Utc>),
}

impl SortValue {
    #[must_use]
    pub fn extract(record: &Record, field: &str, field_type: FieldType) -> Self {
        let Some(value) = record.get(field) else {
            return Self::Missing;
        };

        let parsed = match field_type {
            FieldType::String => text_value(value).map(|raw| Self::Text {
                folded: raw.to_lowercase(),
                raw,
            }),
            FieldType::Number => number_value(value).map(Self::Number),
            FieldType::Date => date_value(value).map(Self::Date),
        };
        parsed.unwrap_or(Self::Missing)
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Text { .. } => 1,
            Self::Number(_) => 2,
            Self::Date(_) => 3,
        }
    }

    /// Total order with `Missing` lowest.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text { folded: a, raw: ra }, Self::Text { folded: b, raw: rb }) => {
                a.cmp(b).then_with(|| ra.cmp(rb))
            }
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Stably reorders `indices` (positions into `records`) by `spec`.
pub fn sort_indices(records: &[Record], indices: &mut Vec<usize>, spec: &SortSpec, field_type: FieldType) {
    let mut keyed: Vec<(SortValue, usize)> = indices
        .iter()
        .map(|&i| (SortValue::extract(&records[i], &spec.field, field_type), i))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.compare(b);
        if spec.direction.is_ascending() {
            ordering
        } else {
            ordering.reverse()
        }
    });

    *indices = keyed.into_iter().map(|(_, i)| i).collect();
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn number_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub(crate) fn date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::String(s) => parse_date(s.trim()),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
