//! Admingrid: the client-side tabular data engine behind admin list screens.
//!
//! Every list screen of the events/ticketing admin dashboard (users, tickets,
//! invoices, newsletter subscribers, blog posts) needs the same machinery:
//! - Case-insensitive free-text search over a declared set of fields
//! - Faceted equality filters (OR within a field, AND across fields)
//! - A single-key, type-aware, stable sort with direction toggling
//! - Fixed-size pagination with clamping
//! - Row selection for bulk actions (approve, reject, export)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Presentation layer (external)                      │  ← Renders, forwards intents
//! └─────────────────────────────────────────────────────┘
//!                        │ Event            ▲ TableViewModel
//! ┌─────────────────────────────────────────────────────┐
//! │  Engine (engine/)                                   │
//! │  - Intent handler → Actions                         │
//! │  - TableEngine state + derived indices              │
//! │  - search / filters / sort / pagination / selection │
//! └─────────────────────────────────────────────────────┘
//!         │                                    │
//! ┌───────────────┐                   ┌─────────────────┐
//! │ View (view/)  │                   │ Domain (domain/)│
//! │ - View models │                   │ - Record, keys  │
//! └───────────────┘                   │ - Field types   │
//!                                     │ - Errors        │
//!                                     └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Records, record keys, field descriptors and errors
//! - [`engine`]: The stateful engine, its derivation pipeline and intent handler
//! - [`view`]: Render-ready view models
//! - [`observability`]: Tracing subscriber setup
//!
//! # Configuration
//!
//! Each screen declares its fields up front, either in code or in TOML:
//!
//! ```toml
//! key_field = "_id"
//! page_size = 5
//! searchable_fields = ["_id", "user_id.name", "product_id.title"]
//!
//! [[sortable_fields]]
//! field = "created_at"
//! type = "date"
//!
//! [default_sort]
//! field = "created_at"
//! direction = "descending"
//! ```
//!
//! # Example
//!
//! ```rust
//! use admingrid::{Config, FieldSpec, FieldType, Record, TableEngine};
//!
//! let config = Config {
//!     searchable_fields: vec!["name".to_string()],
//!     sortable_fields: vec![FieldSpec::new("amt", FieldType::Number)],
//!     page_size: 2,
//!     ..Default::default()
//! };
//!
//! let mut engine = TableEngine::new(config)?;
//! engine.set_records(vec![
//!     Record::new().with("id", 1).with("name", "Alice").with("amt", 50),
//!     Record::new().with("id", 2).with("name", "bob").with("amt", 10),
//! ]);
//!
//! engine.set_search_query("a");
//! let page = engine.derived_page();
//! assert_eq!(page.total_count, 1);
//! # Ok::<(), admingrid::GridError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod domain;
pub mod engine;
pub mod observability;
pub mod view;

pub use domain::{records_from_json, FieldSpec, FieldType, GridError, Record, RecordKey, Result};
pub use engine::{
    handle_event, Action, BulkAction, DerivedPage, Event, FilterClause, SearchMode,
    SortDirection, SortSpec, TableEngine,
};
pub use view::TableViewModel;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Page size used when a screen does not declare one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Per-screen engine configuration.
///
/// Field names may be dotted paths into nested objects (`user_id.name`).
/// Every field is optional in TOML; missing values take the [`Default`]
/// values below.
///
/// # Example
///
/// ```rust
/// use admingrid::Config;
///
/// let config = Config::from_toml_str(r#"
///     key_field = "_id"
///     page_size = 5
///     searchable_fields = ["email"]
/// "#)?;
/// assert_eq!(config.page_size, 5);
/// # Ok::<(), admingrid::GridError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Field holding each record's unique key. Default: `"id"`
    pub key_field: String,

    /// Rows per page; must be greater than zero. Default: [`DEFAULT_PAGE_SIZE`]
    pub page_size: usize,

    /// Fields scanned by the free-text search.
    pub searchable_fields: Vec<String>,

    /// How the search query is matched against searchable fields.
    /// Default: substring
    pub search_mode: SearchMode,

    /// Fields offered as filter facets. A declared `number` or `date` type
    /// makes filter clauses on that field compare by value rather than by raw
    /// JSON.
    pub filterable_fields: Vec<FieldSpec>,

    /// Fields the user may sort by, with the comparison type for each.
    pub sortable_fields: Vec<FieldSpec>,

    /// Sort applied when the engine is created, before any user interaction.
    pub default_sort: Option<SortSpec>,

    /// Drop selected keys that disappear from the collection on refresh.
    /// Default: `true`
    pub prune_stale_selection: bool,

    /// Tracing level used by [`observability::init_tracing`] when `RUST_LOG`
    /// is unset. Options: `trace`, `debug`, `info`, `warn`, `error`.
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_field: "id".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            searchable_fields: Vec::new(),
            search_mode: SearchMode::default(),
            filterable_fields: Vec::new(),
            sortable_fields: Vec::new(),
            default_sort: None,
            prune_stale_selection: true,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses and validates a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Toml`] for malformed TOML, unknown keys or
    /// unknown field types, and [`GridError::Config`] if validation fails.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Config::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading screen configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Checks the configuration for problems that would otherwise surface
    /// during interaction.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(GridError::Config(
                "page_size must be greater than zero".to_string(),
            ));
        }

        if self.key_field.trim().is_empty() {
            return Err(GridError::Config("key_field must not be empty".to_string()));
        }

        if self.searchable_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(GridError::Config(
                "searchable_fields contains an empty field name".to_string(),
            ));
        }

        check_field_specs("filterable_fields", &self.filterable_fields)?;
        check_field_specs("sortable_fields", &self.sortable_fields)?;

        if let Some(sort) = &self.default_sort {
            if self.sortable_type(&sort.field).is_none() {
                return Err(GridError::Config(format!(
                    "default_sort field `{}` is not declared in sortable_fields",
                    sort.field
                )));
            }
        }

        Ok(())
    }

    /// Declared comparison type for a sortable field.
    #[must_use]
    pub fn sortable_type(&self, field: &str) -> Option<FieldType> {
        self.sortable_fields
            .iter()
            .find(|spec| spec.field == field)
            .map(|spec| spec.field_type)
    }

    /// Declared type for a filterable field.
    #[must_use]
    pub fn filterable_type(&self, field: &str) -> Option<FieldType> {
        self.filterable_fields
            .iter()
            .find(|spec| spec.field == field)
            .map(|spec| spec.field_type)
    }
}

fn check_field_specs(section: &str, specs: &[FieldSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for spec in specs {
        if spec.field.trim().is_empty() {
            return Err(GridError::Config(format!(
                "{section} contains an empty field name"
            )));
        }
        if !seen.insert(spec.field.as_str()) {
            return Err(GridError::Config(format!(
                "{section} declares `{}` more than once",
                spec.field
            )));
        }
    }
    Ok(())
}
