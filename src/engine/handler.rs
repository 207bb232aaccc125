//! Intent handling and state transition logic.
//!
//! This module implements the handler that processes presentation-layer
//! intents and collaborator callbacks, translating them into engine mutations
//! and action sequences.
//!
//! # Architecture
//!
//! ```text
//! User intent → Event → handle_event → TableEngine mutation → Actions
//!                  ↑                                              ↓
//!                  └─── RecordsLoaded / BulkCompleted ←── executor / record source
//! ```
//!
//! # Event Types
//!
//! - **Data**: `RecordsLoaded`
//! - **Criteria**: `SearchChanged`, `ClearSearch`, `FilterToggled`, `ClearFilters`, `SortRequested`
//! - **Paging**: `PageRequested`, `NextPage`, `PreviousPage`
//! - **Selection**: `RowToggled`, `SelectAllToggled`
//! - **Bulk**: `BulkRequested`, `BulkCompleted`, `BulkFailed`
//!
//! # Example
//!
//! ```rust
//! use admingrid::{handle_event, Config, Event, Record, TableEngine};
//!
//! let mut engine = TableEngine::new(Config::default())?;
//! let records = vec![Record::new().with("id", 1)];
//! let (rerender, actions) = handle_event(&mut engine, &Event::RecordsLoaded(records))?;
//! assert!(rerender);
//! assert!(actions.is_empty());
//! # Ok::<(), admingrid::GridError>(())
//! ```

use super::actions::{Action, BulkAction};
use super::state::TableEngine;
use crate::domain::{Record, RecordKey, Result};
use serde_json::Value;

/// Intents from the presentation layer and callbacks from collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The record source finished a fetch.
    RecordsLoaded(Vec<Record>),
    /// The search box changed.
    SearchChanged(String),
    /// The search box's clear button was pressed.
    ClearSearch,
    /// A facet checkbox or filter chip was clicked.
    FilterToggled { field: String, value: Value },
    /// "Clear all filters" was pressed; also empties the search box.
    ClearFilters,
    /// A sortable column header was clicked.
    SortRequested(String),
    /// A page number was clicked.
    PageRequested(usize),
    NextPage,
    PreviousPage,
    /// A row checkbox was clicked.
    RowToggled(RecordKey),
    /// The header checkbox was clicked.
    SelectAllToggled,
    /// A bulk action button was pressed.
    BulkRequested(BulkAction),
    /// The executor reports the bulk action succeeded.
    BulkCompleted(BulkAction),
    /// The executor reports the bulk action failed. Selection is kept so the
    /// admin can retry.
    BulkFailed { action: BulkAction, message: String },
}

/// Processes an event, mutates the engine and returns actions to execute.
///
/// The returned flag tells the presentation layer whether the visible state
/// changed and a re-render is needed.
///
/// # Errors
///
/// Engine operations are infallible once the engine exists; the `Result` is
/// kept so handlers composed around this one can propagate their own errors.
pub fn handle_event(engine: &mut TableEngine, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    match event {
        Event::RecordsLoaded(records) => {
            if engine.records() == records.as_slice() {
                tracing::debug!("records unchanged, skipping render");
                return Ok((false, vec![]));
            }
            engine.set_records(records.clone());
            Ok((true, vec![]))
        }
        Event::SearchChanged(query) => {
            if engine.search_query() == query {
                return Ok((false, vec![]));
            }
            engine.set_search_query(query.clone());
            Ok((true, vec![]))
        }
        Event::ClearSearch => {
            if engine.search_query().is_empty() {
                return Ok((false, vec![]));
            }
            engine.clear_search();
            Ok((true, vec![]))
        }
        Event::FilterToggled { field, value } => {
            engine.toggle_filter(field.clone(), value.clone());
            Ok((true, vec![]))
        }
        Event::ClearFilters => {
            let before = (engine.has_active_criteria(), engine.current_page());
            engine.clear_filters();
            let after = (engine.has_active_criteria(), engine.current_page());
            Ok((before != after, vec![]))
        }
        Event::SortRequested(field) => Ok((engine.set_sort(field), vec![])),
        Event::PageRequested(page) => {
            let before = engine.current_page();
            Ok((engine.set_page(*page) != before, vec![]))
        }
        Event::NextPage => {
            let before = engine.current_page();
            Ok((engine.next_page() != before, vec![]))
        }
        Event::PreviousPage => {
            let before = engine.current_page();
            Ok((engine.previous_page() != before, vec![]))
        }
        Event::RowToggled(key) => {
            let was_selected = engine.is_selected(key);
            let selected = engine.toggle_select(key.clone());
            Ok((selected != was_selected, vec![]))
        }
        Event::SelectAllToggled => {
            engine.toggle_select_all_on_page();
            Ok((true, vec![]))
        }
        Event::BulkRequested(action) => {
            let keys = engine.selection();
            if keys.is_empty() {
                tracing::debug!(action = %action, "bulk action requested with empty selection");
                return Ok((false, vec![]));
            }
            tracing::debug!(action = %action, selected = keys.len(), "dispatching bulk action");
            Ok((false, vec![Action::RunBulkAction { action: *action, keys }]))
        }
        Event::BulkCompleted(action) => {
            tracing::debug!(action = %action, "bulk action completed, refreshing");
            engine.clear_selection();
            Ok((true, vec![Action::RefreshRecords]))
        }
        Event::BulkFailed { action, message } => {
            tracing::error!(action = %action, error = %message, "bulk action failed");
            Ok((false, vec![]))
        }
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::RecordsLoaded(_) => "records_loaded",
        Event::SearchChanged(_) => "search_changed",
        Event::ClearSearch => "clear_search",
        Event::FilterToggled { .. } => "filter_toggled",
        Event::ClearFilters => "clear_filters",
        Event::SortRequested(_) => "sort_requested",
        Event::PageRequested(_) => "page_requested",
        Event::NextPage => "next_page",
        Event::PreviousPage => "previous_page",
        Event::RowToggled(_) => "row_toggled",
        Event::SelectAllToggled => "select_all_toggled",
        Event::BulkRequested(_) => "bulk_requested",
        Event::BulkCompleted(_) => "bulk_completed",
        Event::BulkFailed { .. } => "bulk_failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldSpec, FieldType};
    use crate::Config;

    fn registrations() -> Vec<Record> {
        (1..=4)
            .map(|i| {
                Record::new()
                    .with("id", i)
                    .with("name", format!("attendee-{i}"))
                    .with("status", if i % 2 == 0 { "approved" } else { "pending" })
            })
            .collect()
    }

    fn loaded_engine() -> TableEngine {
        let mut engine = TableEngine::new(Config {
            page_size: 2,
            searchable_fields: vec!["name".into()],
            sortable_fields: vec![FieldSpec::new("name", FieldType::String)],
            ..Default::default()
        })
        .unwrap();
        handle_event(&mut engine, &Event::RecordsLoaded(registrations())).unwrap();
        engine
    }

    #[test]
    fn identical_reload_skips_render() {
        let mut engine = loaded_engine();
        let (rerender, _) = handle_event(&mut engine, &Event::RecordsLoaded(registrations())).unwrap();
        assert!(!rerender);
    }

    #[test]
    fn bulk_request_with_empty_selection_is_dropped() {
        let mut engine = loaded_engine();
        let (_, actions) = handle_event(&mut engine, &Event::BulkRequested(BulkAction::Approve)).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn bulk_flow_dispatches_then_clears_and_refreshes() {
        let mut engine = loaded_engine();
        handle_event(&mut engine, &Event::RowToggled(RecordKey::from("3"))).unwrap();
        handle_event(&mut engine, &Event::RowToggled(RecordKey::from("1"))).unwrap();

        let (_, actions) = handle_event(&mut engine, &Event::BulkRequested(BulkAction::Reject)).unwrap();
        assert_eq!(
            actions,
            vec![Action::RunBulkAction {
                action: BulkAction::Reject,
                keys: vec![RecordKey::from("3"), RecordKey::from("1")],
            }]
        );

        let (_, actions) = handle_event(
            &mut engine,
            &Event::BulkFailed {
                action: BulkAction::Reject,
                message: "502 Bad Gateway".into(),
            },
        )
        .unwrap();
        assert!(actions.is_empty());
        assert_eq!(engine.selection().len(), 2);

        let (rerender, actions) = handle_event(&mut engine, &Event::BulkCompleted(BulkAction::Reject)).unwrap();
        assert!(rerender);
        assert_eq!(actions, vec![Action::RefreshRecords]);
        assert!(engine.selection().is_empty());
    }

    #[test]
    fn clamped_page_request_reports_no_change() {
        let mut engine = loaded_engine();
        let (rerender, _) = handle_event(&mut engine, &Event::PageRequested(0)).unwrap();
        assert!(!rerender);

        let (rerender, _) = handle_event(&mut engine, &Event::NextPage).unwrap();
        assert!(rerender);
        let (rerender, _) = handle_event(&mut engine, &Event::NextPage).unwrap();
        assert!(!rerender);
    }

    #[test]
    fn unknown_row_toggle_reports_no_change() {
        let mut engine = loaded_engine();
        let (rerender, _) = handle_event(&mut engine, &Event::RowToggled(RecordKey::from("99"))).unwrap();
        assert!(!rerender);
    }

    #[test]
    fn sort_on_undeclared_column_reports_no_change() {
        let mut engine = loaded_engine();
        let (rerender, _) = handle_event(&mut engine, &Event::SortRequested("status".into())).unwrap();
        assert!(!rerender);
        let (rerender, _) = handle_event(&mut engine, &Event::SortRequested("name".into())).unwrap();
        assert!(rerender);
    }

    #[test]
    fn clear_filters_from_later_page_rerenders() {
        let mut engine = loaded_engine();
        handle_event(&mut engine, &Event::PageRequested(2)).unwrap();
        assert!(!engine.has_active_criteria());

        let (rerender, _) = handle_event(&mut engine, &Event::ClearFilters).unwrap();
        assert!(rerender);
        assert_eq!(engine.current_page(), 1);

        let (rerender, _) = handle_event(&mut engine, &Event::ClearFilters).unwrap();
        assert!(!rerender);
    }

    #[test]
    fn filter_and_search_events_drive_engine() {
        let mut engine = loaded_engine();
        handle_event(
            &mut engine,
            &Event::FilterToggled {
                field: "status".into(),
                value: Value::from("pending"),
            },
        )
        .unwrap();
        assert_eq!(engine.total_count(), 2);

        handle_event(&mut engine, &Event::SearchChanged("attendee-3".into())).unwrap();
        assert_eq!(engine.total_count(), 1);

        let (rerender, _) = handle_event(&mut engine, &Event::ClearFilters).unwrap();
        assert!(rerender);
        assert_eq!(engine.total_count(), 4);

        let (rerender, _) = handle_event(&mut engine, &Event::ClearSearch).unwrap();
        assert!(!rerender);
    }
}
