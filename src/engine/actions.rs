//! Actions representing side effects for the screen's collaborators.
//!
//! The engine never talks to the backend. When an intent needs a remote
//! mutation or a reload, the handler returns an [`Action`] and the owning
//! screen hands it to the bulk action executor or the record source.
//!
//! # Example
//!
//! ```rust
//! use admingrid::{Action, BulkAction, RecordKey};
//!
//! let actions = vec![Action::RunBulkAction {
//!     action: BulkAction::Approve,
//!     keys: vec![RecordKey::from("u-1"), RecordKey::from("u-7")],
//! }];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::domain::RecordKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote mutations an admin can apply to a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    /// Approve pending users or event registrations.
    Approve,
    /// Reject pending users or event registrations.
    Reject,
    /// Export the selected rows (invoice PDFs, subscriber e-mail lists).
    Export,
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Export => "export",
        })
    }
}

/// Commands for the engine's collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hands the selection to the bulk action executor.
    ///
    /// `keys` is never empty and is in selection order.
    RunBulkAction {
        action: BulkAction,
        keys: Vec<RecordKey>,
    },

    /// Asks the record source to fetch the collection again and deliver it
    /// through `Event::RecordsLoaded`.
    RefreshRecords,
}
