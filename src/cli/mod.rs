//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Entries | Append/remove log records | `log`, `done`, `undo` |
//! | Queries | Habit state per day | `list`, `due`, `show`, `next`, `strength` |
//!
//! ## Output Formats
//!
//! All commands support `--format` (`text` or `json`) and `--verbose` for
//! debug output on stderr.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod habit;
mod log;
mod output;
mod when;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
