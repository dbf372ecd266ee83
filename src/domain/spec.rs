//! Habit specifications and the annotation grammar
//!
//! The bracket payload of a schedule annotation parses into a [`HabitSpec`].
//! The grammar is a stable external contract; previously logged text must
//! keep parsing identically across versions:
//!
//! | Form | Meaning |
//! |------|---------|
//! | `Nd`, `Nw`, `Nm`, `Ny` | due every N days/weeks/months/years since the last completion |
//! | `N/d`, `N/w`, `N/m` | N completions within the current day/week/month |
//! | `N in Kd`, `N in Kw` | N completions within any trailing K-day/week window |
//! | `every <weekday>` | due on that weekday every week |
//! | `every <month-name>` | due once within the named month each year |
//! | `<day>th` | due on that day of every month |
//! | `<month> <day>th` | due on that month/day every year |
//! | `after N <hash>` | due after N completions of the referenced habit |
//! | `every N <tag>` | due after N occurrences of the referenced tag |
//! | *(empty / absent brackets)* | habit discontinued |
//!
//! Comma-separated payloads combine into a [`HabitSpec::Composite`] with OR
//! semantics. Parsing never fails loudly: the log is free text that predates
//! the schedule feature, so malformed payloads degrade to
//! [`ParseOutcome::Unparseable`] and the entry stays ordinary log text.

use std::fmt;

use chrono::Weekday;

use super::entry::find_annotation;
use super::id::HabitId;
use super::resolve::DependencyTarget;

/// Unit for interval schedules (`Nd`, `Nw`, `Nm`, `Ny`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
    Year,
}

impl IntervalUnit {
    fn letter(self) -> char {
        match self {
            IntervalUnit::Day => 'd',
            IntervalUnit::Week => 'w',
            IntervalUnit::Month => 'm',
            IntervalUnit::Year => 'y',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c {
            'd' => Some(IntervalUnit::Day),
            'w' => Some(IntervalUnit::Week),
            'm' => Some(IntervalUnit::Month),
            'y' => Some(IntervalUnit::Year),
            _ => None,
        }
    }
}

/// Calendar period for frequency schedules (`N/d`, `N/w`, `N/m`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodUnit {
    Day,
    Week,
    Month,
}

impl PeriodUnit {
    fn letter(self) -> char {
        match self {
            PeriodUnit::Day => 'd',
            PeriodUnit::Week => 'w',
            PeriodUnit::Month => 'm',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c {
            'd' => Some(PeriodUnit::Day),
            'w' => Some(PeriodUnit::Week),
            'm' => Some(PeriodUnit::Month),
            _ => None,
        }
    }
}

/// A recurring requirement declared by a schedule annotation
///
/// Closed variant set; every evaluator predicate matches exhaustively so the
/// compiler flags any variant a predicate forgets to handle.
#[derive(Debug, Clone, PartialEq)]
pub enum HabitSpec {
    /// Due every `every` units since the last completion
    Interval { every: u32, unit: IntervalUnit },

    /// `count` completions required within the current calendar period
    Frequency { count: u32, per: PeriodUnit },

    /// `count` completions required within any trailing window of
    /// `window_days` days ending on the evaluated day
    SlidingWindow { count: u32, window_days: u32 },

    /// Due on that weekday every week
    Weekday(Weekday),

    /// Due on that day of every month (clamped to short months)
    MonthlyDate { day: u32 },

    /// Due on that month/day every year (day clamped to short months)
    YearlyDate { month: u32, day: u32 },

    /// Due once within the named month each year
    YearlyMonth { month: u32 },

    /// Due once `count` completions of the referenced habit have occurred
    /// since this habit's last completion
    HashDependency { target: HabitId, count: u32 },

    /// Due once `count` occurrences of the referenced tag have accumulated
    /// since this habit's last completion
    TagDependency { tag: String, count: u32 },

    /// OR-combination of sub-specifications
    Composite(Vec<HabitSpec>),

    /// Habit no longer active; excluded from active listings
    Discontinued,
}

/// Result of looking for a schedule annotation in entry text
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// No annotation marker; the entry is ordinary log text
    NotAHabit,
    /// Marker present but the payload does not match the grammar; the entry
    /// stays out of habit processing, silently
    Unparseable,
    /// A parsed specification (possibly the discontinued sentinel)
    Spec(HabitSpec),
}

impl ParseOutcome {
    /// Returns the parsed specification, if any
    pub fn into_spec(self) -> Option<HabitSpec> {
        match self {
            ParseOutcome::Spec(spec) => Some(spec),
            _ => None,
        }
    }
}

/// Parses the schedule annotation of an entry's text
pub fn parse_spec(text: &str) -> ParseOutcome {
    let annotation = match find_annotation(text) {
        Some(a) => a,
        None => return ParseOutcome::NotAHabit,
    };

    let payload = match annotation.payload {
        Some(p) if !p.trim().is_empty() => p,
        // Bare marker or empty brackets: the discontinued sentinel
        _ => return ParseOutcome::Spec(HabitSpec::Discontinued),
    };

    match parse_payload(payload) {
        Some(spec) => ParseOutcome::Spec(spec),
        None => ParseOutcome::Unparseable,
    }
}

fn parse_payload(payload: &str) -> Option<HabitSpec> {
    let parts: Vec<&str> = payload.split(',').map(str::trim).collect();
    if parts.len() == 1 {
        return parse_single(parts[0]);
    }
    let specs: Vec<HabitSpec> = parts
        .iter()
        .map(|p| parse_single(p))
        .collect::<Option<_>>()?;
    Some(HabitSpec::Composite(specs))
}

fn parse_single(part: &str) -> Option<HabitSpec> {
    let part = part.trim().to_lowercase();
    let tokens: Vec<&str> = part.split_whitespace().collect();

    match tokens.as_slice() {
        [single] => {
            if let Some(spec) = parse_interval(single) {
                return Some(spec);
            }
            if let Some(spec) = parse_frequency(single) {
                return Some(spec);
            }
            parse_ordinal(single).map(|day| HabitSpec::MonthlyDate { day })
        }

        ["every", rest] => {
            if let Some(weekday) = parse_weekday(rest) {
                return Some(HabitSpec::Weekday(weekday));
            }
            parse_month(rest).map(|month| HabitSpec::YearlyMonth { month })
        }

        [month, day] => {
            let month = parse_month(month)?;
            let day = parse_ordinal(day)?;
            Some(HabitSpec::YearlyDate { month, day })
        }

        [count, "in", window] => {
            let count = parse_count(count)?;
            let (digits, unit) = split_unit_suffix(window)?;
            let k: u32 = digits.parse().ok().filter(|k| *k >= 1)?;
            let window_days = match unit {
                'd' => k,
                'w' => k * 7,
                _ => return None,
            };
            Some(HabitSpec::SlidingWindow { count, window_days })
        }

        ["after", count, hash] => {
            let count = parse_count(count)?;
            let target: HabitId = hash.parse().ok()?;
            Some(HabitSpec::HashDependency { target, count })
        }

        ["every", count, tag] => {
            let count = parse_count(count)?;
            Some(HabitSpec::TagDependency {
                tag: (*tag).to_string(),
                count,
            })
        }

        _ => None,
    }
}

/// `Nd`, `Nw`, `Nm`, `Ny`
fn parse_interval(token: &str) -> Option<HabitSpec> {
    let (digits, letter) = split_unit_suffix(token)?;
    let every = parse_count(digits)?;
    let unit = IntervalUnit::from_letter(letter)?;
    Some(HabitSpec::Interval { every, unit })
}

/// `N/d`, `N/w`, `N/m`
fn parse_frequency(token: &str) -> Option<HabitSpec> {
    let (count, per) = token.split_once('/')?;
    let count = parse_count(count)?;
    let mut chars = per.chars();
    let letter = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let per = PeriodUnit::from_letter(letter)?;
    Some(HabitSpec::Frequency { count, per })
}

/// Splits `"14d"` into `("14", 'd')`; the suffix must be a single letter
fn split_unit_suffix(token: &str) -> Option<(&str, char)> {
    let last = token.chars().last()?;
    if !last.is_ascii_alphabetic() || token.len() < 2 {
        return None;
    }
    let digits = &token[..token.len() - 1];
    if digits.chars().all(|c| c.is_ascii_digit()) {
        Some((digits, last))
    } else {
        None
    }
}

fn parse_count(token: &str) -> Option<u32> {
    token.parse().ok().filter(|n| *n >= 1)
}

/// `1st`, `2nd`, `3rd`, `4th`, ... up to `31st`
fn parse_ordinal(token: &str) -> Option<u32> {
    for suffix in ["st", "nd", "rd", "th"] {
        if let Some(digits) = token.strip_suffix(suffix) {
            return digits.parse().ok().filter(|d| (1..=31).contains(d));
        }
    }
    None
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    token.parse().ok()
}

fn parse_month(token: &str) -> Option<u32> {
    token
        .parse::<chrono::Month>()
        .ok()
        .map(|m| m.number_from_month())
}

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month as usize - 1).min(11)]
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

impl HabitSpec {
    /// Returns true for the discontinued sentinel
    pub fn is_discontinued(&self) -> bool {
        matches!(self, HabitSpec::Discontinued)
    }

    /// Returns true if this specification (or any composite member) is
    /// anchored to the calendar rather than to completion history
    pub fn is_calendar_anchored(&self) -> bool {
        match self {
            HabitSpec::Weekday(_)
            | HabitSpec::MonthlyDate { .. }
            | HabitSpec::YearlyDate { .. }
            | HabitSpec::YearlyMonth { .. } => true,
            HabitSpec::Composite(specs) => specs.iter().any(HabitSpec::is_calendar_anchored),
            _ => false,
        }
    }

    /// Collects every dependency target this specification references
    pub fn dependency_targets(&self) -> Vec<DependencyTarget> {
        let mut targets = Vec::new();
        self.collect_targets(&mut targets);
        targets
    }

    fn collect_targets(&self, out: &mut Vec<DependencyTarget>) {
        match self {
            HabitSpec::HashDependency { target, .. } => {
                out.push(DependencyTarget::Habit(target.clone()));
            }
            HabitSpec::TagDependency { tag, .. } => {
                out.push(DependencyTarget::Tag(tag.clone()));
            }
            HabitSpec::Composite(specs) => {
                for spec in specs {
                    spec.collect_targets(out);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for HabitSpec {
    /// Canonical rendering; reparsing it reproduces an equivalent variant
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HabitSpec::Interval { every, unit } => write!(f, "{}{}", every, unit.letter()),
            HabitSpec::Frequency { count, per } => write!(f, "{}/{}", count, per.letter()),
            HabitSpec::SlidingWindow { count, window_days } => {
                write!(f, "{} in {}d", count, window_days)
            }
            HabitSpec::Weekday(weekday) => write!(f, "every {}", weekday_name(*weekday)),
            HabitSpec::MonthlyDate { day } => write!(f, "{}", ordinal(*day)),
            HabitSpec::YearlyDate { month, day } => {
                write!(f, "{} {}", month_name(*month), ordinal(*day))
            }
            HabitSpec::YearlyMonth { month } => write!(f, "every {}", month_name(*month)),
            HabitSpec::HashDependency { target, count } => {
                write!(f, "after {} {}", count, target)
            }
            HabitSpec::TagDependency { tag, count } => write!(f, "every {} {}", count, tag),
            HabitSpec::Composite(specs) => {
                for (i, spec) in specs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", spec)?;
                }
                Ok(())
            }
            HabitSpec::Discontinued => Ok(()),
        }
    }
}
