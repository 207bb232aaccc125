//! Engine layer: state, derivation pipeline and intent handling.
//!
//! The engine follows a unidirectional data flow:
//!
//! ```text
//! Event → handle_event → TableEngine mutators → recompute → Actions
//!                               │
//!                               └── derived_page / compute_viewmodel (pure reads)
//! ```
//!
//! # Modules
//!
//! - [`state`]: The [`TableEngine`] and its derived page
//! - [`pipeline`]: Pure search → filter → sort derivation
//! - [`search`]: Substring and fuzzy text matching
//! - [`filters`]: Equality filter clauses and facet grouping
//! - [`sort`]: Sort specs and type-aware comparison
//! - [`pagination`]: Page arithmetic and clamping
//! - [`selection`]: Ordered row selection
//! - [`handler`]: Event processing
//! - [`actions`]: Side-effect commands for collaborators

pub mod actions;
pub mod filters;
pub mod handler;
pub mod pagination;
pub mod pipeline;
pub mod search;
pub mod selection;
pub mod sort;
pub mod state;

pub use actions::{Action, BulkAction};
pub use filters::{FilterClause, FilterSet};
pub use handler::{handle_event, Event};
pub use pagination::PageState;
pub use search::SearchMode;
pub use selection::SelectionSet;
pub use sort::{SortDirection, SortSpec};
pub use state::{DerivedPage, TableEngine};
