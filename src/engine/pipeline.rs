//! The derivation pipeline: search, then filters, then sort.
//!
//! Pagination is applied afterwards by slicing the result. The pipeline is a
//! pure function of its inputs and returns positions into the raw collection
//! rather than copies of the records.

use super::filters::FilterSet;
use super::search::Searcher;
use super::sort::{sort_indices, SortSpec};
use crate::domain::Record;
use crate::Config;

/// Positions of `records` that survive `query` and `filters`, ordered by `sort`.
///
/// A sort on a field that `config` does not declare sortable is skipped.
#[must_use]
pub fn derive_indices(
    records: &[Record],
    config: &Config,
    query: &str,
    filters: &FilterSet,
    sort: Option<&SortSpec>,
) -> Vec<usize> {
    let _span = tracing::debug_span!(
        "derive_indices",
        total_records = records.len(),
        query_len = query.len(),
        filter_count = filters.len(),
        sort_field = sort.map(|s| s.field.as_str()),
    )
    .entered();

    let searcher = Searcher::new(config.search_mode, query);
    let groups = filters.groups(config);

    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            searcher
                .as_ref()
                .map_or(true, |s| s.matches(record, &config.searchable_fields))
        })
        .filter(|(_, record)| FilterSet::matches_groups(&groups, record))
        .map(|(i, _)| i)
        .collect();

    if let Some(spec) = sort {
        match config.sortable_type(&spec.field) {
            Some(field_type) => sort_indices(records, &mut indices, spec, field_type),
            None => tracing::debug!(field = %spec.field, "sort field not declared, skipping sort"),
        }
    }

    tracing::debug!(derived_count = indices.len(), "derivation complete");
    indices
}
