//! Habit query commands: list, due, show, next, strength

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use super::output::Output;
use super::when;
use crate::domain::{
    build_streams, resolve_dependencies, DependencyBindings, HabitId, HabitStream, NOT_DUE_SOON,
};
use crate::storage::LogStore;

/// Loaded engine state shared by every query command
struct Snapshot {
    streams: Vec<HabitStream>,
    deps: DependencyBindings,
}

fn load(output: &Output, store: &LogStore) -> Result<Snapshot> {
    let log = store.read_all()?;
    output.verbose(&format!("Read {} log entries", log.len()));

    let streams = build_streams(&log);
    let deps = resolve_dependencies(&streams, &log);
    output.verbose(&format!(
        "Built {} active streams, {} dependency targets",
        streams.len(),
        deps.len()
    ));

    Ok(Snapshot { streams, deps })
}

fn day_status(stream: &HabitStream, day: NaiveDate, deps: &DependencyBindings) -> &'static str {
    if stream.is_due_on(day, deps) {
        "due"
    } else if stream.is_covered_on(day) {
        "covered"
    } else {
        "-"
    }
}

/// Lists all active habits with their status on a day
pub fn list(
    output: &Output,
    store: &LogStore,
    on: Option<&str>,
    window_days: u32,
) -> Result<()> {
    let day = parse_day(on)?;
    let snapshot = load(output, store)?;

    if output.is_json() {
        let items: Vec<_> = snapshot
            .streams
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id.to_string(),
                    "name": s.name,
                    "spec": s.spec.to_string(),
                    "status": day_status(s, day, &snapshot.deps),
                    "strength": s.strength(window_days, day, &snapshot.deps),
                    "last_done": s.last_done().map(|t| t.to_string()),
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    if snapshot.streams.is_empty() {
        println!("No active habits.");
        return Ok(());
    }

    println!("Active habits ({}) on {}:", snapshot.streams.len(), day);
    println!("{:<10} {:<8} {:>8}  NAME", "ID", "STATUS", "STRENGTH");
    println!("{}", "-".repeat(60));
    for stream in &snapshot.streams {
        println!(
            "{:<10} {:<8} {:>7.0}%  {} [{}]",
            stream.id,
            day_status(stream, day, &snapshot.deps),
            stream.strength(window_days, day, &snapshot.deps) * 100.0,
            stream.name,
            stream.spec,
        );
    }
    Ok(())
}

/// Lists only the habits due on a day
pub fn due(output: &Output, store: &LogStore, on: Option<&str>) -> Result<()> {
    let day = parse_day(on)?;
    let snapshot = load(output, store)?;

    let due: Vec<&HabitStream> = snapshot
        .streams
        .iter()
        .filter(|s| s.is_due_on(day, &snapshot.deps))
        .collect();

    if output.is_json() {
        let items: Vec<_> = due
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id.to_string(),
                    "name": s.name,
                    "spec": s.spec.to_string(),
                })
            })
            .collect();
        output.data(&items);
    } else if due.is_empty() {
        println!("Nothing due on {}.", day);
    } else {
        println!("Due on {} ({}):", day, due.len());
        for stream in due {
            println!("{:<10} {}", stream.id, stream.name);
        }
    }
    Ok(())
}

/// Shows one habit in detail
pub fn show(output: &Output, store: &LogStore, id: &str, window_days: u32) -> Result<()> {
    let today = when::today();
    let snapshot = load(output, store)?;
    let stream = find(&snapshot, id)?;

    let offset = stream.next_due_offset(today, &snapshot.deps);
    let windowed = stream.strength(window_days, today, &snapshot.deps);
    let all_time = stream.strength(0, today, &snapshot.deps);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": stream.id.to_string(),
            "name": stream.name,
            "spec": stream.spec.to_string(),
            "calendar_anchored": stream.spec.is_calendar_anchored(),
            "completions": stream.completions.len(),
            "last_done": stream.last_done().map(|t| t.to_string()),
            "status": day_status(stream, today, &snapshot.deps),
            "next_due_offset": offset,
            "not_due_soon": offset == NOT_DUE_SOON,
            "strength": windowed,
            "strength_all_time": all_time,
        }));
        return Ok(());
    }

    println!("{} ({})", stream.name, stream.id);
    println!("  schedule:    {}", stream.spec);
    println!("  completions: {}", stream.completions.len());
    if let Some(last) = stream.last_done() {
        println!("  last done:   {}", last);
    }
    println!("  today:       {}", day_status(stream, today, &snapshot.deps));
    println!("  next due:    {}", describe_offset(offset));
    println!(
        "  strength:    {:.0}% over {} days, {:.0}% all-time",
        windowed * 100.0,
        window_days,
        all_time * 100.0
    );
    Ok(())
}

/// Prints the day offset until a habit is next due
pub fn next(output: &Output, store: &LogStore, id: &str) -> Result<()> {
    let today = when::today();
    let snapshot = load(output, store)?;
    let stream = find(&snapshot, id)?;

    let offset = stream.next_due_offset(today, &snapshot.deps);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": stream.id.to_string(),
            "next_due_offset": offset,
            "not_due_soon": offset == NOT_DUE_SOON,
        }));
    } else {
        println!("{}: {}", stream.name, describe_offset(offset));
    }
    Ok(())
}

/// Prints the compliance score for a habit
pub fn strength(
    output: &Output,
    store: &LogStore,
    id: &str,
    window_days: u32,
    as_of: Option<&str>,
) -> Result<()> {
    let as_of = parse_day(as_of)?;
    let snapshot = load(output, store)?;
    let stream = find(&snapshot, id)?;

    let score = stream.strength(window_days, as_of, &snapshot.deps);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": stream.id.to_string(),
            "window_days": window_days,
            "as_of": as_of.to_string(),
            "strength": score,
        }));
    } else if window_days == 0 {
        println!("{}: {:.0}% all-time", stream.name, score * 100.0);
    } else {
        println!(
            "{}: {:.0}% over the {} days ending {}",
            stream.name,
            score * 100.0,
            window_days,
            as_of
        );
    }
    Ok(())
}

fn find<'a>(snapshot: &'a Snapshot, id: &str) -> Result<&'a HabitStream> {
    let id: HabitId = id.parse()?;
    snapshot
        .streams
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| anyhow!("No active habit with ID {}", id))
}

fn parse_day(on: Option<&str>) -> Result<NaiveDate> {
    match on {
        Some(s) => when::parse_date(s),
        None => Ok(when::today()),
    }
}

fn describe_offset(offset: u32) -> String {
    match offset {
        0 => "due today".to_string(),
        1 => "due tomorrow".to_string(),
        NOT_DUE_SOON => "not due soon".to_string(),
        n => format!("due in {} days", n),
    }
}
