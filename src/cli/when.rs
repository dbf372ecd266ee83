//! Date and datetime argument parsing
//!
//! The engine is deliberately timezone-naive, so CLI arguments parse into
//! local naive values and "now"/"today" come from the local clock.

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};

/// Parses a `YYYY-MM-DD` argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => bail!("Invalid date '{}': expected YYYY-MM-DD", s),
    }
}

/// Parses a timestamp argument: `YYYY-MM-DD HH:MM[:SS]` (a `T` separator
/// also works), or a bare date meaning midnight
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    bail!("Invalid timestamp '{}': expected YYYY-MM-DD [HH:MM[:SS]]", s)
}

/// The local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The local clock time
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
