//! Entry commands: log, done, undo

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;

use super::output::Output;
use super::when;
use crate::domain::{build_streams, parse_spec, HabitId, LogEntry, ParseOutcome};
use crate::storage::LogStore;

/// Appends a free-text entry, reporting whether it declared a habit
pub fn add(output: &Output, store: &LogStore, words: &[String], at: Option<&str>) -> Result<()> {
    let at = parse_at(at)?;
    let text = words.join(" ");
    let entry = LogEntry::new(text, at);

    store.append(&entry)?;
    output.verbose_ctx("log", &format!("Appended entry at {}", entry.at));

    match parse_spec(&entry.text) {
        ParseOutcome::Spec(spec) if spec.is_discontinued() => {
            output.success(&format!("Logged; habit {} discontinued", entry.habit_id()));
        }
        ParseOutcome::Spec(spec) => {
            output.success(&format!("Logged habit {} [{}]", entry.habit_id(), spec));
        }
        ParseOutcome::Unparseable => {
            // malformed annotations are tolerated; the entry is plain text
            output.success("Logged (annotation did not parse; entry kept as plain text)");
        }
        ParseOutcome::NotAHabit => {
            output.success("Logged");
        }
    }
    Ok(())
}

/// Records a completion by re-logging the habit's most recent raw text
pub fn done(output: &Output, store: &LogStore, id: &str, at: Option<&str>) -> Result<()> {
    let id: HabitId = id.parse()?;
    let at = parse_at(at)?;

    let log = store.read_all()?;
    let streams = build_streams(&log);
    let stream = streams
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| anyhow!("No active habit with ID {}", id))?;

    let entry = LogEntry::new(stream.raw_text.clone(), at);
    store.append(&entry)?;
    output.success(&format!("Completed {} ({})", stream.name, id));
    Ok(())
}

/// Removes the most recent completion entry of a habit
pub fn undo(output: &Output, store: &LogStore, id: &str) -> Result<()> {
    let id: HabitId = id.parse()?;

    let mut entries = store.read_all()?;
    let streams = build_streams(&entries);
    let stream = streams
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| anyhow!("No active habit with ID {}", id))?;

    let last = stream
        .last_done()
        .ok_or_else(|| anyhow!("Habit {} has no completions to undo", id))?;

    let position = entries
        .iter()
        .rposition(|e| e.at == last && e.habit_id() == id)
        .ok_or_else(|| anyhow!("Could not locate the last completion of {}", id))?;

    let removed = entries.remove(position);
    store.write_all(&entries)?;
    output.verbose_ctx("undo", &format!("Removed entry at {}", removed.at));
    output.success(&format!("Undid completion of {} at {}", stream.name, removed.at));
    Ok(())
}

fn parse_at(at: Option<&str>) -> Result<NaiveDateTime> {
    match at {
        Some(s) => when::parse_datetime(s),
        None => Ok(when::now()),
    }
}
