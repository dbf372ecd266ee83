//! Habit streams: completion histories grouped by identity
//!
//! A stream collects every annotated entry sharing one content identity. The
//! chronologically last entry's specification is the current one
//! (last-write-wins, so re-logging with a new annotation reschedules the
//! habit); earlier completions still count toward history. Streams whose
//! current specification is the discontinued sentinel are dropped from
//! active listings.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use super::entry::LogEntry;
use super::id::HabitId;
use super::resolve::DependencyBindings;
use super::spec::{parse_spec, HabitSpec, ParseOutcome};
use super::strength::strength;

/// One habit: identity, current specification, and full completion history
#[derive(Debug, Clone, PartialEq)]
pub struct HabitStream {
    /// Content identity shared by all completions
    pub id: HabitId,

    /// Display name: the core text of the most recent entry
    pub name: String,

    /// Currently active specification (from the latest entry)
    pub spec: HabitSpec,

    /// All completion timestamps, ascending
    pub completions: Vec<NaiveDateTime>,

    /// Raw text of the most recent entry, reused when programmatically
    /// recording a new completion
    pub raw_text: String,
}

impl HabitStream {
    /// Completions dated on or before `day` (the point-in-time prefix the
    /// due/required predicates need)
    pub fn completions_up_to(&self, day: NaiveDate) -> &[NaiveDateTime] {
        let end = self.completions.partition_point(|c| c.date() <= day);
        &self.completions[..end]
    }

    /// Timestamp of the most recent completion, if any
    pub fn last_done(&self) -> Option<NaiveDateTime> {
        self.completions.last().copied()
    }

    /// Whether the habit is due on `day`, judged point-in-time
    pub fn is_due_on(&self, day: NaiveDate, deps: &DependencyBindings) -> bool {
        self.spec.is_due_on(day, self.completions_up_to(day), deps)
    }

    /// Whether `day` is covered by a prior completion's interval window
    pub fn is_covered_on(&self, day: NaiveDate) -> bool {
        self.spec.is_covered_on(day, self.completions_up_to(day))
    }

    /// Compliance score over the trailing `window_days` ending at `as_of`
    /// (0 = all-time)
    pub fn strength(&self, window_days: u32, as_of: NaiveDate, deps: &DependencyBindings) -> f64 {
        strength(&self.spec, &self.completions, window_days, as_of, deps)
    }

    /// Days until next due from `from`, or the not-due-soon sentinel
    pub fn next_due_offset(&self, from: NaiveDate, deps: &DependencyBindings) -> u32 {
        self.spec
            .next_due_offset(from, self.completions_up_to(from), deps)
    }
}

/// Builds one stream per identity that has ever carried a valid
/// specification.
///
/// Entries are scanned oldest to newest; every valid-annotation entry
/// appends its timestamp and overwrites the stream's current specification
/// and raw text. Streams left on the discontinued sentinel are dropped.
/// Unannotated and unparseable entries never join a stream, though they
/// remain visible to dependency resolution over the full log.
pub fn build_streams(log: &[LogEntry]) -> Vec<HabitStream> {
    let mut ordered: Vec<&LogEntry> = log.iter().collect();
    ordered.sort_by_key(|e| e.at);

    let mut streams: HashMap<HabitId, HabitStream> = HashMap::new();

    for entry in ordered {
        let spec = match parse_spec(&entry.text) {
            ParseOutcome::Spec(spec) => spec,
            ParseOutcome::NotAHabit | ParseOutcome::Unparseable => continue,
        };
        let id = entry.habit_id();

        match streams.get_mut(&id) {
            Some(stream) => {
                stream.completions.push(entry.at);
                stream.spec = spec;
                stream.name = entry.core_text();
                stream.raw_text = entry.text.clone();
            }
            None => {
                streams.insert(
                    id.clone(),
                    HabitStream {
                        id,
                        name: entry.core_text(),
                        spec,
                        completions: vec![entry.at],
                        raw_text: entry.text.clone(),
                    },
                );
            }
        }
    }

    let mut active: Vec<HabitStream> = streams
        .into_values()
        .filter(|s| !s.spec.is_discontinued())
        .collect();

    // deterministic listing order
    active.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.hash().cmp(b.id.hash())));
    active
}
