//! Log entries and schedule annotation handling
//!
//! An entry is free text plus a local timestamp. Any entry may carry a
//! schedule annotation: the marker token `#habit` followed by a bracketed
//! payload, e.g. `water the plants #habit[2d]`. The marker match is
//! case-insensitive. Everything outside the annotation is the entry's
//! "core text", which determines its habit identity.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::id::HabitId;

/// Marker token that introduces a schedule annotation
pub const MARKER: &str = "#habit";

/// A single record in the event log
///
/// Immutable once created; the engine only reads entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Local timestamp (no timezone; all calendar arithmetic is naive)
    pub at: NaiveDateTime,

    /// Free text, possibly carrying a schedule annotation
    pub text: String,
}

impl LogEntry {
    /// Creates a new entry
    pub fn new(text: impl Into<String>, at: NaiveDateTime) -> Self {
        Self {
            at,
            text: text.into(),
        }
    }

    /// The local calendar date of this entry
    pub fn day(&self) -> NaiveDate {
        self.at.date()
    }

    /// The entry's text with all annotations removed and whitespace normalized
    pub fn core_text(&self) -> String {
        core_text(&self.text)
    }

    /// The habit identity of this entry's core text
    pub fn habit_id(&self) -> HabitId {
        HabitId::for_entry_text(&self.text)
    }
}

/// A located schedule annotation within entry text
///
/// `payload` is the bracket contents: `None` when the marker stands alone
/// (no brackets at all). An empty or whitespace-only payload is equivalent.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation<'a> {
    /// Bracket contents, if brackets were present
    pub payload: Option<&'a str>,
    /// Byte offset where the annotation starts (at the marker)
    pub start: usize,
    /// Byte offset just past the annotation
    pub end: usize,
}

/// Finds the byte offset of the first standalone marker token.
///
/// The marker must sit at the start of the text or after whitespace, and be
/// followed by whitespace, `[`, or the end of the text, so words like
/// `#habitual` never match.
fn find_marker(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let marker = MARKER.as_bytes();
    let mut i = 0;
    while i + marker.len() <= bytes.len() {
        if bytes[i..i + marker.len()].eq_ignore_ascii_case(marker)
            && (i == 0 || bytes[i - 1].is_ascii_whitespace())
        {
            match bytes.get(i + marker.len()) {
                None => return Some(i),
                Some(b) if b.is_ascii_whitespace() || *b == b'[' => return Some(i),
                Some(_) => {}
            }
        }
        i += 1;
    }
    None
}

/// Locates the first schedule annotation in entry text, if any
pub fn find_annotation(text: &str) -> Option<Annotation<'_>> {
    let start = find_marker(text)?;
    let after_marker = start + MARKER.len();
    let rest = &text[after_marker..];
    let trimmed = rest.trim_start();
    let skipped = rest.len() - trimmed.len();

    if let Some(inner) = trimmed.strip_prefix('[') {
        let bracket_open = after_marker + skipped + 1;
        return match inner.find(']') {
            Some(close) => Some(Annotation {
                payload: Some(&inner[..close]),
                start,
                end: bracket_open + close + 1,
            }),
            // Unclosed bracket swallows the rest of the text; the payload
            // almost certainly fails the grammar and parses as unparseable.
            None => Some(Annotation {
                payload: Some(inner),
                start,
                end: text.len(),
            }),
        };
    }

    Some(Annotation {
        payload: None,
        start,
        end: after_marker,
    })
}

/// Strips every annotation from `text` and normalizes whitespace.
///
/// This is the identity-bearing form of an entry: two entries with equal
/// core text are completions of the same habit.
pub fn core_text(text: &str) -> String {
    let mut remaining = text.to_string();
    loop {
        let span = match find_annotation(&remaining) {
            Some(ann) => (ann.start, ann.end),
            None => break,
        };
        remaining.replace_range(span.0..span.1, " ");
    }
    remaining.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns true if a whitespace-delimited token counts as an occurrence of
/// `tag`: equal to or prefixed by the tag, case-insensitively. A leading `#`
/// on either side is ignored so `#gym` in an entry satisfies the tag `gym`.
pub fn token_matches_tag(token: &str, tag: &str) -> bool {
    let token = token.trim_start_matches('#').to_lowercase();
    let tag = tag.trim_start_matches('#').to_lowercase();
    !tag.is_empty() && token.starts_with(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn no_marker_means_no_annotation() {
        assert!(find_annotation("went for a walk").is_none());
        assert!(find_annotation("picked up a new #habitual read").is_none());
    }

    #[test]
    fn marker_with_payload() {
        let ann = find_annotation("water the plants #habit[2d]").unwrap();
        assert_eq!(ann.payload, Some("2d"));
        assert_eq!(&"water the plants #habit[2d]"[ann.start..ann.end], "#habit[2d]");
    }

    #[test]
    fn marker_is_case_insensitive() {
        let ann = find_annotation("stretch #HABIT[every monday]").unwrap();
        assert_eq!(ann.payload, Some("every monday"));
    }

    #[test]
    fn bare_marker_has_no_payload() {
        let ann = find_annotation("stretch #habit").unwrap();
        assert_eq!(ann.payload, None);
    }

    #[test]
    fn empty_brackets_have_empty_payload() {
        let ann = find_annotation("stretch #habit[]").unwrap();
        assert_eq!(ann.payload, Some(""));
    }

    #[test]
    fn whitespace_between_marker_and_bracket() {
        let ann = find_annotation("stretch #habit [3/w]").unwrap();
        assert_eq!(ann.payload, Some("3/w"));
    }

    #[test]
    fn unclosed_bracket_takes_rest_of_text() {
        let ann = find_annotation("stretch #habit[3/w oops").unwrap();
        assert_eq!(ann.payload, Some("3/w oops"));
        assert_eq!(ann.end, "stretch #habit[3/w oops".len());
    }

    #[test]
    fn core_text_strips_annotation_and_normalizes() {
        assert_eq!(core_text("water the plants #habit[2d]"), "water the plants");
        assert_eq!(core_text("  water   the plants  "), "water the plants");
        assert_eq!(core_text("#habit[2d] water the plants"), "water the plants");
    }

    #[test]
    fn core_text_strips_every_annotation() {
        assert_eq!(
            core_text("run #habit[2d] around the block #habit[1w]"),
            "run around the block"
        );
    }

    #[test]
    fn tag_matching_is_prefix_and_case_insensitive() {
        assert!(token_matches_tag("gym", "gym"));
        assert!(token_matches_tag("Gym!", "gym"));
        assert!(token_matches_tag("#gym", "gym"));
        assert!(token_matches_tag("gyms", "GYM"));
        assert!(!token_matches_tag("gy", "gym"));
        assert!(!token_matches_tag("swim", "gym"));
    }

    #[test]
    fn entry_accessors() {
        let e = LogEntry::new("water the plants #habit[2d]", at("2026-03-01"));
        assert_eq!(e.day(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(e.core_text(), "water the plants");
        assert_eq!(e.habit_id(), HabitId::new("water the plants"));
    }

    #[test]
    fn entry_serde_roundtrip() {
        let e = LogEntry::new("stretch #habit[3/w]", at("2026-03-01"));
        let json = serde_json::to_string(&e).unwrap();
        let parsed: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(e, parsed);
    }
}
