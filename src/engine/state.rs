//! Table engine state and view model computation.
//!
//! This module defines [`TableEngine`], the single stateful object an admin
//! list screen owns. It holds the raw record collection plus the four pieces of
//! user-controlled state (search query, filters, sort, page) and the row
//! selection, and keeps a cached derivation consistent with them.
//!
//! # State Components
//!
//! - **Records**: The working copy, replaced wholesale on every refresh
//! - **Derived**: Positions of records surviving search and filters, in sort
//!   order; recomputed after every mutator
//! - **Page**: Current page over the derived positions
//! - **Selection**: Keys checked for bulk actions, independent of which page
//!   is showing
//!
//! # Example
//!
//! ```rust
//! use admingrid::{Config, Record, TableEngine};
//!
//! let mut engine = TableEngine::new(Config { page_size: 2, ..Default::default() })?;
//! engine.set_records((1..=5).map(|id| Record::new().with("id", id)).collect());
//! engine.set_page(10);
//!
//! let page = engine.derived_page();
//! assert_eq!((page.current_page, page.total_pages, page.rows.len()), (3, 3, 1));
//! # Ok::<(), admingrid::GridError>(())
//! ```

use super::filters::{FilterClause, FilterSet};
use super::pagination::PageState;
use super::pipeline::derive_indices;
use super::selection::SelectionSet;
use super::sort::{SortDirection, SortSpec};
use crate::domain::{Record, RecordKey, Result};
use crate::view::viewmodel::{DisplayRow, EmptyState, FilterChip, SortIndicator, TableViewModel};
use crate::Config;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// The visible page handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPage<'a> {
    pub rows: Vec<&'a Record>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    /// True iff the page has rows and every one of their keys is selected.
    pub select_all: bool,
}

/// Client-side tabular data engine for one list screen.
///
/// Mutators run to completion and leave the derivation consistent; reads
/// never change state.
#[derive(Debug, Clone)]
pub struct TableEngine {
    config: Config,

    records: Vec<Record>,

    /// Key of each record, parallel to `records`.
    keys: Vec<Option<RecordKey>>,

    /// Every key present in `records`.
    known_keys: HashSet<RecordKey>,

    search_query: String,

    filters: FilterSet,

    sort: Option<SortSpec>,

    page: PageState,

    selection: SelectionSet,

    /// Positions into `records` after search, filters and sort.
    derived: Vec<usize>,
}

impl TableEngine {
    /// Creates an engine with an empty collection.
    ///
    /// The query and filters start empty, the sort starts at the configured
    /// default (if any) and the page at 1.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Config`](crate::GridError::Config) if the
    /// configuration fails validation.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            key_field = %config.key_field,
            page_size = config.page_size,
            searchable = config.searchable_fields.len(),
            sortable = config.sortable_fields.len(),
            default_sort = ?config.default_sort,
            "initializing table engine"
        );

        Ok(Self {
            page: PageState::new(config.page_size),
            sort: config.default_sort.clone(),
            config,
            records: Vec::new(),
            keys: Vec::new(),
            known_keys: HashSet::new(),
            search_query: String::new(),
            filters: FilterSet::default(),
            selection: SelectionSet::default(),
            derived: Vec::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    #[must_use]
    pub const fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Direction to show on `field`'s column header, if it is the sorted one.
    #[must_use]
    pub fn sort_direction_for(&self, field: &str) -> Option<SortDirection> {
        self.sort
            .as_ref()
            .filter(|spec| spec.field == field)
            .map(|spec| spec.direction)
    }

    /// Active filter clauses in the order they were toggled on.
    #[must_use]
    pub fn active_filters(&self) -> &[FilterClause] {
        self.filters.clauses()
    }

    /// True when a search query or at least one filter narrows the rows.
    #[must_use]
    pub fn has_active_criteria(&self) -> bool {
        !self.search_query.is_empty() || !self.filters.is_empty()
    }

    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.page.current_page()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.page.total_pages(self.derived.len())
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.derived.len()
    }

    /// Replaces the raw collection.
    ///
    /// Search, filters and sort are kept. The page is reset to 1 only when it
    /// no longer exists. With `prune_stale_selection`, selected keys missing
    /// from the new collection are dropped.
    pub fn set_records(&mut self, records: Vec<Record>) {
        let _span = tracing::debug_span!("set_records", record_count = records.len()).entered();

        self.keys = records
            .iter()
            .map(|record| record.key(&self.config.key_field))
            .collect();
        self.known_keys = self.keys.iter().flatten().cloned().collect();
        self.records = records;

        if self.config.prune_stale_selection {
            let known = &self.known_keys;
            let dropped = self.selection.retain(|key| known.contains(key));
            if dropped > 0 {
                tracing::debug!(dropped, "pruned stale selection");
            }
        }

        self.recompute();

        if self.page.is_out_of_range(self.derived.len()) {
            tracing::debug!(
                previous_page = self.page.current_page(),
                "current page out of range after refresh, resetting"
            );
            self.page.reset();
        }
    }

    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
        tracing::trace!(query = %self.search_query, "search query updated");
        self.page.reset();
        self.recompute();
    }

    /// Empties the search query, leaving filters alone.
    pub fn clear_search(&mut self) {
        self.set_search_query(String::new());
    }

    /// Adds the clause if absent, removes it if present.
    ///
    /// Matching follows the type declared for `field` in `filterable_fields`.
    /// Undeclared fields are accepted and compare as raw JSON.
    ///
    /// Returns `true` if the clause is active afterwards.
    pub fn toggle_filter(&mut self, field: impl Into<String>, value: impl Into<Value>) -> bool {
        let clause = FilterClause::new(field, value);
        let field_type = self.config.filterable_type(&clause.field);
        if field_type.is_none() {
            tracing::debug!(field = %clause.field, "filter on undeclared field, comparing raw values");
        }
        tracing::debug!(field = %clause.field, value = %clause.value, ?field_type, "toggling filter");
        let active = self.filters.toggle(clause);
        self.page.reset();
        self.recompute();
        active
    }

    /// Empties the filters and the search query.
    pub fn clear_filters(&mut self) {
        tracing::debug!(filter_count = self.filters.len(), "clearing filters");
        self.filters.clear();
        self.search_query.clear();
        self.page.reset();
        self.recompute();
    }

    /// Sorts by `field`, flipping direction if it is already the sort field.
    ///
    /// Fields not declared in `sortable_fields` are ignored; returns whether
    /// the sort changed. The current page is kept.
    pub fn set_sort(&mut self, field: &str) -> bool {
        if self.config.sortable_type(field).is_none() {
            tracing::debug!(field, "ignoring sort on undeclared field");
            return false;
        }

        let next = match self.sort.take() {
            Some(current) if current.field == field => {
                SortSpec::new(current.field, current.direction.flipped())
            }
            _ => SortSpec::ascending(field),
        };
        tracing::debug!(field = %next.field, direction = ?next.direction, "sort updated");
        self.sort = Some(next);
        self.recompute();
        true
    }

    /// Moves to page `n`, clamped to `[1, total_pages]`. Returns the page
    /// landed on.
    pub fn set_page(&mut self, n: usize) -> usize {
        let landed = self.page.set_page(n, self.derived.len());
        if landed != n {
            tracing::debug!(requested = n, landed, "page request clamped");
        }
        landed
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.current_page().saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.set_page(self.current_page().saturating_sub(1))
    }

    /// Checks or unchecks one row.
    ///
    /// A key that does not belong to any record in the collection is never
    /// added. Returns `true` if the key is selected afterwards.
    pub fn toggle_select(&mut self, key: impl Into<RecordKey>) -> bool {
        let key = key.into();
        if !self.selection.contains(&key) && !self.known_keys.contains(&key) {
            tracing::debug!(key = %key, "ignoring selection of unknown key");
            return false;
        }
        self.selection.toggle(key)
    }

    /// Header checkbox: unchecks every row on this page if all are checked,
    /// otherwise checks them all. Rows on other pages are untouched.
    pub fn toggle_select_all_on_page(&mut self) {
        let page_keys: Vec<RecordKey> = self.current_page_keys().cloned().collect();
        if self.selection.contains_all(&page_keys) {
            for key in &page_keys {
                self.selection.remove(key);
            }
        } else {
            for key in page_keys {
                self.selection.insert(key);
            }
        }
        tracing::debug!(selected = self.selection.len(), "page selection toggled");
    }

    /// True iff the current page has rows and all of them are selected.
    #[must_use]
    pub fn select_all(&self) -> bool {
        self.selection.contains_all(self.current_page_keys())
    }

    #[must_use]
    pub fn is_selected(&self, key: &RecordKey) -> bool {
        self.selection.contains(key)
    }

    /// Selected keys in the order they were checked.
    #[must_use]
    pub fn selection(&self) -> Vec<RecordKey> {
        self.selection.to_vec()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Records whose key is selected, in selection order.
    ///
    /// Keys retained across a refresh that no longer match a record are
    /// skipped.
    #[must_use]
    pub fn selected_records(&self) -> Vec<&Record> {
        let mut by_key: HashMap<&RecordKey, usize> = HashMap::new();
        for (i, key) in self.keys.iter().enumerate() {
            if let Some(key) = key {
                by_key.entry(key).or_insert(i);
            }
        }

        self.selection
            .iter()
            .filter_map(|key| by_key.get(key).map(|&i| &self.records[i]))
            .collect()
    }

    /// The visible page. Pure read.
    #[must_use]
    pub fn derived_page(&self) -> DerivedPage<'_> {
        DerivedPage {
            rows: self
                .current_page_positions()
                .iter()
                .map(|&i| &self.records[i])
                .collect(),
            current_page: self.current_page(),
            total_pages: self.total_pages(),
            total_count: self.total_count(),
            select_all: self.select_all(),
        }
    }

    /// Distinct values of `field` across the unfiltered collection, in order
    /// of first appearance. Records without the field contribute nothing.
    #[must_use]
    pub fn facet_values(&self, field: &str) -> Vec<Value> {
        let mut values: Vec<Value> = Vec::new();
        for value in self.records.iter().filter_map(|record| record.get(field)) {
            if !values.contains(value) {
                values.push(value.clone());
            }
        }
        values
    }

    /// 1-based `(first, last)` row numbers of the current page within the
    /// filtered total; `None` when there are no rows.
    #[must_use]
    pub fn page_range(&self) -> Option<(usize, usize)> {
        self.page.row_range(self.derived.len())
    }

    /// Packages the derived page for rendering.
    #[must_use]
    pub fn compute_viewmodel(&self) -> TableViewModel {
        let rows: Vec<DisplayRow> = self
            .current_page_positions()
            .iter()
            .map(|&i| {
                let key = self.keys[i].clone();
                let is_selected = key.as_ref().is_some_and(|k| self.selection.contains(k));
                DisplayRow {
                    key,
                    record: self.records[i].clone(),
                    is_selected,
                }
            })
            .collect();

        let total_count = self.total_count();
        let range = self.page_range();
        let summary = match range {
            Some((first, last)) => format!("Showing {first} to {last} of {total_count}"),
            None => format!("Showing 0 of {total_count}"),
        };

        let empty_state = rows.is_empty().then(|| self.compute_empty_state());

        TableViewModel {
            rows,
            current_page: self.current_page(),
            total_pages: self.total_pages(),
            total_count,
            select_all: self.select_all(),
            has_previous: self.current_page() > 1,
            has_next: self.current_page() < self.total_pages(),
            range,
            summary,
            sort: self.sort.as_ref().map(|spec| SortIndicator {
                field: spec.field.clone(),
                direction: spec.direction,
            }),
            active_filters: self
                .filters
                .clauses()
                .iter()
                .map(|clause| FilterChip {
                    field: clause.field.clone(),
                    value: clause.value.clone(),
                    label: chip_label(&clause.value),
                })
                .collect(),
            selected_count: self.selection.len(),
            empty_state,
        }
    }

    fn compute_empty_state(&self) -> EmptyState {
        let subtitle = if self.has_active_criteria() {
            "Try adjusting your search or filter criteria"
        } else {
            "Nothing to show yet"
        };
        EmptyState {
            message: "No records found".to_string(),
            subtitle: subtitle.to_string(),
        }
    }

    fn current_page_positions(&self) -> &[usize] {
        &self.derived[self.page.bounds(self.derived.len())]
    }

    fn current_page_keys(&self) -> impl Iterator<Item = &RecordKey> {
        self.current_page_positions()
            .iter()
            .filter_map(|&i| self.keys[i].as_ref())
    }

    fn recompute(&mut self) {
        self.derived = derive_indices(
            &self.records,
            &self.config,
            &self.search_query,
            &self.filters,
            self.sort.as_ref(),
        );
    }
}

fn chip_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldSpec, FieldType};
    use serde_json::json;

    fn users() -> Vec<Record> {
        vec![
            Record::new().with("id", "u1").with("name", "Asha").with("role", "admin").with("status", "pending"),
            Record::new().with("id", "u2").with("name", "Ben").with("role", "user").with("status", "approved"),
            Record::new().with("id", "u3").with("name", "Chen").with("role", "user").with("status", "pending"),
            Record::new().with("id", "u4").with("name", "Dana").with("status", "rejected"),
        ]
    }

    fn engine(page_size: usize) -> TableEngine {
        let mut engine = TableEngine::new(Config {
            page_size,
            searchable_fields: vec!["name".into()],
            filterable_fields: vec![FieldSpec::new("status", FieldType::String)],
            sortable_fields: vec![FieldSpec::new("name", FieldType::String)],
            ..Default::default()
        })
        .unwrap();
        engine.set_records(users());
        engine
    }

    fn names(engine: &TableEngine) -> Vec<String> {
        engine
            .derived_page()
            .rows
            .iter()
            .filter_map(|r| r.get("name").and_then(Value::as_str).map(String::from))
            .collect()
    }

    #[test]
    fn new_rejects_invalid_config() {
        assert!(TableEngine::new(Config { page_size: 0, ..Default::default() }).is_err());
    }

    #[test]
    fn empty_engine_has_one_empty_page() {
        let engine = TableEngine::new(Config::default()).unwrap();
        let page = engine.derived_page();
        assert!(page.rows.is_empty());
        assert_eq!((page.current_page, page.total_pages, page.total_count), (1, 1, 0));
        assert!(!page.select_all);
    }

    #[test]
    fn default_sort_applies_before_interaction() {
        let mut engine = TableEngine::new(Config {
            sortable_fields: vec![FieldSpec::new("name", FieldType::String)],
            default_sort: Some(SortSpec::new("name", SortDirection::Descending)),
            ..Default::default()
        })
        .unwrap();
        engine.set_records(users());
        assert_eq!(names(&engine), vec!["Dana", "Chen", "Ben", "Asha"]);

        // same field flips from the configured direction
        engine.set_sort("name");
        assert_eq!(engine.sort_direction_for("name"), Some(SortDirection::Ascending));
    }

    #[test]
    fn set_sort_ignores_undeclared_fields() {
        let mut engine = engine(10);
        assert!(!engine.set_sort("status"));
        assert_eq!(engine.sort(), None);
    }

    #[test]
    fn set_sort_keeps_current_page() {
        let mut engine = engine(2);
        engine.set_page(2);
        engine.set_sort("name");
        assert_eq!(engine.current_page(), 2);
    }

    #[test]
    fn search_and_filter_reset_page() {
        let mut engine = engine(2);
        engine.set_page(2);
        engine.set_search_query("");
        assert_eq!(engine.current_page(), 1);

        engine.set_page(2);
        engine.toggle_filter("status", "pending");
        assert_eq!(engine.current_page(), 1);
        assert_eq!(names(&engine), vec!["Asha", "Chen"]);
    }

    #[test]
    fn clear_search_keeps_filters() {
        let mut engine = engine(10);
        engine.toggle_filter("status", "pending");
        engine.set_search_query("chen");
        assert_eq!(engine.total_count(), 1);

        engine.clear_search();
        assert_eq!(engine.total_count(), 2);
        assert_eq!(engine.active_filters().len(), 1);
    }

    #[test]
    fn clear_filters_also_clears_search() {
        let mut engine = engine(10);
        engine.toggle_filter("status", "pending");
        engine.set_search_query("chen");
        engine.clear_filters();
        assert!(!engine.has_active_criteria());
        assert_eq!(engine.total_count(), 4);
    }

    #[test]
    fn set_records_keeps_page_when_still_in_range() {
        let mut engine = engine(1);
        engine.set_page(3);

        let mut more = users();
        more.push(Record::new().with("id", "u5").with("name", "Eve"));
        engine.set_records(more);
        assert_eq!(engine.current_page(), 3);

        engine.set_records(users().into_iter().take(2).collect());
        assert_eq!(engine.current_page(), 1);
    }

    #[test]
    fn next_and_previous_stay_in_bounds() {
        let mut engine = engine(3);
        assert_eq!(engine.previous_page(), 1);
        assert_eq!(engine.next_page(), 2);
        assert_eq!(engine.next_page(), 2);
    }

    #[test]
    fn declared_number_filter_matches_numeric_strings() {
        let mut engine = TableEngine::new(Config {
            filterable_fields: vec![FieldSpec::new("amt", FieldType::Number)],
            ..Default::default()
        })
        .unwrap();
        engine.set_records(vec![
            Record::new().with("id", 1).with("amt", 10),
            Record::new().with("id", 2).with("amt", 25),
        ]);

        assert!(engine.toggle_filter("amt", "10"));
        assert_eq!(engine.total_count(), 1);
        assert_eq!(engine.compute_viewmodel().active_filters[0].label, "10");
    }

    #[test]
    fn undeclared_filter_field_compares_raw_values() {
        let mut engine = engine(10);
        assert!(engine.toggle_filter("role", "user"));
        assert_eq!(names(&engine), vec!["Ben", "Chen"]);

        engine.clear_filters();
        engine.set_records(vec![Record::new().with("id", "x").with("seats", 2)]);
        engine.toggle_filter("seats", "2");
        assert_eq!(engine.total_count(), 0);
    }

    #[test]
    fn toggle_select_ignores_unknown_keys() {
        let mut engine = engine(10);
        assert!(!engine.toggle_select("nope"));
        assert!(engine.toggle_select("u2"));
        assert!(!engine.toggle_select("u2"));
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn select_all_tracks_current_page() {
        let mut engine = engine(2);
        engine.toggle_select("u1");
        assert!(!engine.select_all());
        engine.toggle_select("u2");
        assert!(engine.select_all());

        engine.next_page();
        assert!(!engine.select_all());

        engine.toggle_select_all_on_page();
        assert!(engine.select_all());
        assert_eq!(
            engine.selection(),
            vec![RecordKey::from("u1"), RecordKey::from("u2"), RecordKey::from("u3"), RecordKey::from("u4")]
        );

        engine.toggle_select_all_on_page();
        assert_eq!(engine.selection(), vec![RecordKey::from("u1"), RecordKey::from("u2")]);
    }

    #[test]
    fn refresh_prunes_stale_selection_by_default() {
        let mut engine = engine(10);
        engine.toggle_select("u1");
        engine.toggle_select("u3");

        engine.set_records(users().into_iter().skip(1).collect());
        assert_eq!(engine.selection(), vec![RecordKey::from("u3")]);
    }

    #[test]
    fn refresh_retains_selection_when_pruning_disabled() {
        let mut engine = TableEngine::new(Config {
            prune_stale_selection: false,
            ..Default::default()
        })
        .unwrap();
        engine.set_records(users());
        engine.toggle_select("u1");
        engine.set_records(Vec::new());

        assert_eq!(engine.selection(), vec![RecordKey::from("u1")]);
        assert!(engine.selected_records().is_empty());
    }

    #[test]
    fn selected_records_follow_selection_order() {
        let mut engine = engine(10);
        engine.toggle_select("u3");
        engine.toggle_select("u1");

        let picked: Vec<Option<RecordKey>> = engine
            .selected_records()
            .iter()
            .map(|r| r.key("id"))
            .collect();
        assert_eq!(picked, vec![Some(RecordKey::from("u3")), Some(RecordKey::from("u1"))]);
    }

    #[test]
    fn facets_come_from_raw_collection_in_first_seen_order() {
        let mut engine = engine(10);
        engine.toggle_filter("status", "approved");

        assert_eq!(
            engine.facet_values("status"),
            vec![json!("pending"), json!("approved"), json!("rejected")]
        );
        // u4 has no role
        assert_eq!(engine.facet_values("role"), vec![json!("admin"), json!("user")]);
        assert!(engine.facet_values("missing").is_empty());
    }

    #[test]
    fn viewmodel_reports_range_chips_and_selection() {
        let mut engine = engine(3);
        engine.toggle_select("u2");
        engine.toggle_filter("role", "user");
        engine.set_sort("name");

        let vm = engine.compute_viewmodel();
        assert_eq!(vm.summary, "Showing 1 to 2 of 2");
        assert_eq!(vm.range, Some((1, 2)));
        assert_eq!(vm.rows.len(), 2);
        assert!(vm.rows[0].is_selected);
        assert!(!vm.rows[1].is_selected);
        assert_eq!(vm.active_filters[0].label, "user");
        assert_eq!(vm.sort.as_ref().map(|s| s.direction), Some(SortDirection::Ascending));
        assert_eq!(vm.selected_count, 1);
        assert!(!vm.has_previous && !vm.has_next);
        assert!(vm.empty_state.is_none());
    }

    #[test]
    fn viewmodel_empty_state_depends_on_criteria() {
        let mut engine = engine(3);
        engine.set_search_query("zzz");
        let vm = engine.compute_viewmodel();
        assert_eq!(vm.summary, "Showing 0 of 0");
        let empty = vm.empty_state.unwrap();
        assert_eq!(empty.subtitle, "Try adjusting your search or filter criteria");

        let blank = TableEngine::new(Config::default()).unwrap().compute_viewmodel();
        assert_eq!(blank.empty_state.unwrap().subtitle, "Nothing to show yet");
    }
}
