//! JSONL storage for the event log
//!
//! Entries are stored with one JSON object per line, append-only in normal
//! operation. Uses file locking for concurrent access safety; rewrites (for
//! undo) go through a temp file and an atomic rename.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::LogEntry;

/// Store for log entries in JSONL format
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    /// Creates a log store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full log, sorted by timestamp (stable for equal instants)
    pub fn read_all(&self) -> Result<Vec<LogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open log: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on log")?;

        let reader = BufReader::new(&file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse entry at line {}", line_num + 1))?;

            entries.push(entry);
        }

        // Lock is released when file is dropped
        entries.sort_by_key(|e| e.at);
        Ok(entries)
    }

    /// Appends a single entry
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log: {}", self.path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on log")?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(entry).context("Failed to serialize entry")?;
        writeln!(writer, "{}", line).context("Failed to write entry")?;
        writer.flush().context("Failed to flush log")?;

        Ok(())
    }

    /// Rewrites the full log (used when removing an entry)
    pub fn write_all(&self, entries: &[LogEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on log")?;

            let mut writer = BufWriter::new(&file);
            for entry in entries {
                let line = serde_json::to_string(entry).context("Failed to serialize entry")?;
                writeln!(writer, "{}", line).context("Failed to write entry")?;
            }
            writer.flush().context("Failed to flush log")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn entry(day: u32, text: &str) -> LogEntry {
        let at = NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        LogEntry::new(text, at)
    }

    #[test]
    fn read_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::new(dir.path().join("log.jsonl"));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn append_and_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::new(dir.path().join("log.jsonl"));

        store.append(&entry(2, "floss #habit[1d]")).unwrap();
        store.append(&entry(1, "went for a walk")).unwrap();

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 2);
        // sorted by timestamp, not file order
        assert_eq!(all[0].text, "went for a walk");
    }

    #[test]
    fn write_all_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let store = LogStore::new(dir.path().join("log.jsonl"));

        store.append(&entry(1, "a")).unwrap();
        store.append(&entry(2, "b")).unwrap();

        let mut all = store.read_all().unwrap();
        all.pop();
        store.write_all(&all).unwrap();

        let rest = store.read_all().unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].text, "a");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.jsonl");
        std::fs::write(
            &path,
            "{\"at\":\"2026-03-01T09:00:00\",\"text\":\"hello\"}\n\n",
        )
        .unwrap();

        let store = LogStore::new(&path);
        assert_eq!(store.read_all().unwrap().len(), 1);
    }
}
