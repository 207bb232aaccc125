//! Equality filters with multi-select facets.
//!
//! Clauses on the same field are alternatives (a ticket may be `open` OR
//! `pending`); clauses on different fields must all hold (status AND
//! category).
//!
//! Fields declared in `filterable_fields` compare under their declared type:
//! `number` fields compare numerically (`"10"` matches `10`) and `date` fields
//! compare as instants. `string` fields and undeclared fields compare as raw
//! JSON with no coercion.

use super::sort::{date_value, number_value};
use crate::domain::{FieldType, Record};
use crate::Config;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single `(field, value)` equality test.
///
/// The value is kept as given so filter chips show what the admin picked. A
/// clause whose value is `null` never matches, since null fields read as
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub field: String,
    pub value: Value,
}

impl FilterClause {
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Clauses for one field, ORed together.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGroup<'a> {
    pub field: &'a str,
    /// Declared filter type, `None` for an undeclared field.
    pub field_type: Option<FieldType>,
    pub values: Vec<&'a Value>,
}

impl FieldGroup<'_> {
    fn matches(&self, record: &Record) -> bool {
        record.get(self.field).is_some_and(|actual| {
            self.values
                .iter()
                .any(|wanted| values_equal(actual, wanted, self.field_type))
        })
    }
}

/// Equality under a declared field type.
///
/// When either side cannot be read as the declared type the raw JSON values
/// are compared instead.
#[must_use]
pub fn values_equal(actual: &Value, wanted: &Value, field_type: Option<FieldType>) -> bool {
    let typed = match field_type {
        Some(FieldType::Number) => number_value(actual)
            .zip(number_value(wanted))
            .map(|(a, b)| a.total_cmp(&b).is_eq()),
        Some(FieldType::Date) => date_value(actual)
            .zip(date_value(wanted))
            .map(|(a, b)| a == b),
        Some(FieldType::String) | None => None,
    };
    typed.unwrap_or_else(|| actual == wanted)
}

/// The active filter clauses, in the order they were toggled on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
}

impl FilterSet {
    /// Adds the clause if absent, removes it if present.
    ///
    /// Returns `true` if the clause is active afterwards.
    pub fn toggle(&mut self, clause: FilterClause) -> bool {
        if let Some(pos) = self.clauses.iter().position(|c| *c == clause) {
            self.clauses.remove(pos);
            false
        } else {
            self.clauses.push(clause);
            true
        }
    }

    pub fn clear(&mut self) {
        self.clauses.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Groups clauses by field, in order of each field's first clause, with
    /// each field's declared type looked up in `config`.
    #[must_use]
    pub fn groups(&self, config: &Config) -> Vec<FieldGroup<'_>> {
        let mut groups: Vec<FieldGroup<'_>> = Vec::new();
        for clause in &self.clauses {
            match groups.iter_mut().find(|g| g.field == clause.field) {
                Some(group) => group.values.push(&clause.value),
                None => groups.push(FieldGroup {
                    field: &clause.field,
                    field_type: config.filterable_type(&clause.field),
                    values: vec![&clause.value],
                }),
            }
        }
        groups
    }

    /// Evaluates pre-computed `groups` against a record.
    #[must_use]
    pub fn matches_groups(groups: &[FieldGroup<'_>], record: &Record) -> bool {
        groups.iter().all(|group| group.matches(record))
    }
}
