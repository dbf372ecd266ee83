//! Habit identity derived from entry text
//!
//! ID Format: `h-{7-char-hash}` (e.g., `h-7f2b4c1`)
//!
//! The hash is derived from the entry's core text: the text with every
//! schedule annotation removed and whitespace normalized. Two entries with
//! the same core text always map to the same identity, no matter how their
//! annotations are written (or whether they carry one at all).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::entry::core_text;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid habit ID format: expected 'h-{{7-char-hash}}', got '{0}'")]
    InvalidHabitId(String),
}

/// Generates a 7-character hash from normalized core text
fn generate_hash(core: &str) -> String {
    let hash = blake3::hash(core.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Habit identity in the format `h-{7-char-hash}`
///
/// Entries sharing an identity are completions (or respecs) of the same
/// habit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HabitId {
    hash: String,
}

impl HabitId {
    /// Creates an identity from already-normalized core text
    pub fn new(core: &str) -> Self {
        Self {
            hash: generate_hash(core),
        }
    }

    /// Creates an identity from raw entry text, stripping any annotations
    pub fn for_entry_text(text: &str) -> Self {
        Self::new(&core_text(text))
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h-{}", self.hash)
    }
}

impl FromStr for HabitId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("h-")
            .ok_or_else(|| IdError::InvalidHabitId(s.to_string()))?;

        if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdError::InvalidHabitId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_lowercase(),
        })
    }
}

impl TryFrom<String> for HabitId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HabitId> for String {
    fn from(id: HabitId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_deterministic() {
        let a = HabitId::new("water the plants");
        let b = HabitId::new("water the plants");
        assert_eq!(a, b);
    }

    #[test]
    fn identity_ignores_annotation() {
        let a = HabitId::for_entry_text("water the plants #habit[2d]");
        let b = HabitId::for_entry_text("water the plants #HABIT[1w]");
        let c = HabitId::for_entry_text("water the plants");
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn different_core_text_differs() {
        let a = HabitId::new("water the plants");
        let b = HabitId::new("feed the cat");
        assert_ne!(a, b);
    }

    #[test]
    fn id_format_is_correct() {
        let id = HabitId::new("test");
        let s = id.to_string();

        assert!(s.starts_with("h-"));
        assert_eq!(s.len(), 9); // "h-" + 7 chars
    }

    #[test]
    fn id_parses_correctly() {
        let original = HabitId::new("test");
        let parsed: HabitId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn id_rejects_invalid_format() {
        assert!("invalid".parse::<HabitId>().is_err());
        assert!("h-short".parse::<HabitId>().is_err());
        assert!("h-toolonggg".parse::<HabitId>().is_err());
        assert!("h-gggggg1".parse::<HabitId>().is_err()); // 'g' is not hex
    }

    #[test]
    fn serde_roundtrip() {
        let original = HabitId::new("test");
        let json = serde_json::to_string(&original).unwrap();
        let parsed: HabitId = serde_json::from_str(&json).unwrap();
        assert_eq!(original, parsed);
    }
}
