//! Cadence - A local-first event log with habit scheduling
//!
//! Cadence records free-text, timestamped entries. Any entry can declare
//! itself a recurring habit with an inline annotation (`#habit[2d]`,
//! `#habit[every monday]`, ...); the engine groups completions by content
//! identity and answers, for any calendar day, whether a habit is due,
//! covered, or satisfied, plus an aggregate compliance score.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{HabitId, HabitSpec, HabitStream, LogEntry, ParseOutcome};
