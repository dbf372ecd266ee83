//! Cross-entry dependency resolution
//!
//! Dependency specifications (`after N <hash>`, `every N <tag>`) are due
//! based on occurrences elsewhere in the log, not on their own completion
//! history. Rather than mutating occurrence lists into the specification
//! values, resolution produces a [`DependencyBindings`] side-table keyed by
//! target, shared by every dependent and passed alongside the specification
//! into the evaluator predicates.
//!
//! Resolution is batched: one pass over the full log covers every distinct
//! target, so the cost stays O(total entries) no matter how many habits
//! depend on the same tag.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::entry::{token_matches_tag, LogEntry};
use super::id::HabitId;
use super::stream::HabitStream;

/// What a dependency specification points at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyTarget {
    /// A free-text tag matched against whitespace-delimited tokens
    Tag(String),
    /// Another habit's content identity
    Habit(HabitId),
}

/// Sorted occurrence timestamps per dependency target
///
/// A target never observed in the log simply has no entry here; dependents
/// read an empty list and are correctly never due.
#[derive(Debug, Clone, Default)]
pub struct DependencyBindings {
    occurrences: HashMap<DependencyTarget, Vec<NaiveDateTime>>,
}

impl DependencyBindings {
    /// Creates an empty binding table (sufficient for non-dependency specs)
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects the occurrence list for a target, keeping it sorted
    pub fn bind(&mut self, target: DependencyTarget, mut when: Vec<NaiveDateTime>) {
        when.sort();
        self.occurrences.insert(target, when);
    }

    /// Occurrence timestamps for a target, ascending; empty if never seen
    pub fn occurrences(&self, target: &DependencyTarget) -> &[NaiveDateTime] {
        self.occurrences
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct targets bound
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    /// Returns true if no targets are bound
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

/// Scans the full log once and binds occurrence timestamps for every
/// dependency target referenced by the given streams' current specifications.
pub fn resolve_dependencies(streams: &[HabitStream], log: &[LogEntry]) -> DependencyBindings {
    let mut targets: Vec<DependencyTarget> = Vec::new();
    for stream in streams {
        for target in stream.spec.dependency_targets() {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
    }

    if targets.is_empty() {
        return DependencyBindings::new();
    }

    let wants_hashes = targets
        .iter()
        .any(|t| matches!(t, DependencyTarget::Habit(_)));

    let mut occurrences: HashMap<DependencyTarget, Vec<NaiveDateTime>> =
        targets.iter().map(|t| (t.clone(), Vec::new())).collect();

    for entry in log {
        let core = entry.core_text();
        let entry_id = wants_hashes.then(|| HabitId::new(&core));

        for target in &targets {
            let hit = match target {
                DependencyTarget::Tag(tag) => {
                    core.split_whitespace().any(|tok| token_matches_tag(tok, tag))
                }
                DependencyTarget::Habit(id) => entry_id.as_ref() == Some(id),
            };
            if hit {
                if let Some(list) = occurrences.get_mut(target) {
                    list.push(entry.at);
                }
            }
        }
    }

    for list in occurrences.values_mut() {
        list.sort();
    }

    DependencyBindings { occurrences }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stream::build_streams;
    use chrono::NaiveDate;

    fn entry(day: &str, text: &str) -> LogEntry {
        let at = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        LogEntry::new(text, at)
    }

    #[test]
    fn tag_occurrences_are_collected_and_sorted() {
        let log = vec![
            entry("2026-03-03", "went to the #gym"),
            entry("2026-03-01", "gym session was great"),
            entry("2026-03-02", "treat myself #habit[every 2 gym]"),
            entry("2026-03-04", "nothing to see here"),
        ];
        let streams = build_streams(&log);
        let bindings = resolve_dependencies(&streams, &log);

        let target = DependencyTarget::Tag("gym".to_string());
        let occ = bindings.occurrences(&target);
        assert_eq!(occ.len(), 2);
        assert!(occ.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn hash_occurrences_match_core_text_identity() {
        let log = vec![
            entry("2026-03-01", "floss #habit[1d]"),
            entry("2026-03-02", "floss #habit[1d]"),
            entry("2026-03-02", "floss"), // same identity, no annotation
            entry(
                "2026-03-03",
                &format!("reward #habit[after 2 {}]", HabitId::new("floss")),
            ),
        ];
        let streams = build_streams(&log);
        let bindings = resolve_dependencies(&streams, &log);

        let target = DependencyTarget::Habit(HabitId::new("floss"));
        assert_eq!(bindings.occurrences(&target).len(), 3);
    }

    #[test]
    fn unseen_target_yields_empty_list() {
        let log = vec![entry("2026-03-01", "treat #habit[every 3 sauna]")];
        let streams = build_streams(&log);
        let bindings = resolve_dependencies(&streams, &log);

        // the dependent entry itself does not mention the tag in core text
        let target = DependencyTarget::Tag("sauna".to_string());
        assert!(bindings.occurrences(&target).is_empty());
    }

    #[test]
    fn no_dependency_streams_no_work() {
        let log = vec![entry("2026-03-01", "floss #habit[1d]")];
        let streams = build_streams(&log);
        let bindings = resolve_dependencies(&streams, &log);
        assert!(bindings.is_empty());
    }
}
