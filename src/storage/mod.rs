//! # Storage Layer
//!
//! Persistence for Cadence. The engine itself keeps no state; the only
//! stored artifact is the event log, recomputed in full on every query.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Event log | JSONL (one JSON per line) | platform data dir, `log.jsonl` |
//! | Config | TOML | platform config dir, `config.toml` |
//!
//! [`LogStore`] uses file locking (`fs2`) for concurrent access and atomic
//! temp-file + rename rewrites.

mod config;
mod jsonl;

pub use config::{Config, ConfigError};
pub use jsonl::LogStore;
