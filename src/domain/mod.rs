//! Domain models for Cadence
//!
//! The pure habit engine: no I/O, no clocks, no shared state. Everything is
//! a synchronous computation over an immutable snapshot of the log plus the
//! day being queried.

mod entry;
mod id;
mod resolve;
mod schedule;
mod spec;
mod stream;
mod strength;

pub use entry::{core_text, find_annotation, token_matches_tag, Annotation, LogEntry, MARKER};
pub use id::{HabitId, IdError};
pub use resolve::{resolve_dependencies, DependencyBindings, DependencyTarget};
pub use schedule::NOT_DUE_SOON;
pub use spec::{parse_spec, HabitSpec, IntervalUnit, ParseOutcome, PeriodUnit};
pub use stream::{build_streams, HabitStream};
pub use strength::strength;
