//! View model types representing a render-ready table screen.
//!
//! View models are computed by
//! [`TableEngine::compute_viewmodel`](crate::TableEngine::compute_viewmodel)
//! and consumed by the presentation layer. They contain no business logic,
//! only display-ready data.
//!
//! # Example
//!
//! ```rust
//! use admingrid::{Config, TableEngine};
//!
//! let engine = TableEngine::new(Config::default())?;
//! let vm = engine.compute_viewmodel();
//! assert_eq!(vm.summary, "Showing 0 of 0");
//! assert!(vm.empty_state.is_some());
//! # Ok::<(), admingrid::GridError>(())
//! ```

use crate::domain::{Record, RecordKey};
use crate::engine::SortDirection;
use serde_json::Value;

/// Complete view model for one table screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TableViewModel {
    /// Rows of the current page, in display order.
    pub rows: Vec<DisplayRow>,

    /// 1-based current page.
    pub current_page: usize,

    /// Number of pages, at least 1.
    pub total_pages: usize,

    /// Rows matching search and filters, across all pages.
    pub total_count: usize,

    /// State of the header checkbox.
    pub select_all: bool,

    /// Whether the previous/next pagination buttons are enabled.
    pub has_previous: bool,
    pub has_next: bool,

    /// 1-based `(first, last)` row numbers of this page, `None` when empty.
    pub range: Option<(usize, usize)>,

    /// Footer text, e.g. "Showing 6 to 10 of 23".
    pub summary: String,

    /// Column currently sorted, for the header arrow.
    pub sort: Option<SortIndicator>,

    /// Active filters, rendered as removable chips.
    pub active_filters: Vec<FilterChip>,

    /// Number of selected rows, including rows on other pages.
    pub selected_count: usize,

    /// Shown instead of the table when the page has no rows.
    pub empty_state: Option<EmptyState>,
}

/// One table row.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    /// `None` if the record carries no usable key; such rows cannot be selected.
    pub key: Option<RecordKey>,
    pub record: Record,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortIndicator {
    pub field: String,
    pub direction: SortDirection,
}

/// An active filter clause with a display label.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChip {
    pub field: String,
    pub value: Value,
    /// The value as text: strings unquoted, everything else as JSON.
    pub label: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No records found").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}
