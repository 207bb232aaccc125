//! Presentation-facing view models.
//!
//! The engine exposes raw derived state through
//! [`TableEngine::derived_page`](crate::TableEngine::derived_page); this layer
//! packages it with the extras every admin list screen renders (range
//! summary, sort arrow, filter chips, empty state):
//!
//! ```text
//! TableEngine → compute_viewmodel → TableViewModel → presentation layer
//! ```

pub mod viewmodel;

pub use viewmodel::{DisplayRow, EmptyState, FilterChip, SortIndicator, TableViewModel};
