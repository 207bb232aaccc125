//! Domain layer for the admingrid engine.
//!
//! This module contains the core data types shared by the engine, the intent
//! handler and the view model, independent of any rendering layer or record
//! source.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`field`]: Typed field descriptors used by screen configuration
//! - [`record`]: The opaque record type, record keys and payload decoding
//!
//! # Examples
//!
//! ```
//! use admingrid::domain::{Record, RecordKey};
//!
//! let record = Record::new().with("id", 1).with("name", "Alice");
//! assert_eq!(record.key("id"), Some(RecordKey::from("1")));
//! ```

pub mod error;
pub mod field;
pub mod record;

pub use error::{GridError, Result};
pub use field::{FieldSpec, FieldType};
pub use record::{records_from_json, Record, RecordKey};
