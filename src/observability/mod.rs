//! Structured logging for the engine.
//!
//! Every mutator and derivation emits `tracing` spans and events at `debug`
//! and `trace` level. Embedding applications that already install a
//! subscriber get them for free; standalone tools and tests can call
//! [`init_tracing`] to route them to stderr.
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in the screen [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Tracing initialization and subscriber setup

mod init;

pub use init::init_tracing;
