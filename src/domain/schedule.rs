//! Per-day schedule evaluation
//!
//! Every [`HabitSpec`] variant answers the same four questions for a
//! calendar day: is it due, how many completions landed on it, how many are
//! required, and is it covered by a prior completion's interval window.
//! All predicates are pure functions over the day, the completion history,
//! and the dependency bindings; nothing here mutates state.
//!
//! Point-in-time correctness matters: when evaluating day `D`, callers pass
//! only completions dated on or before `D` to `is_due_on`/`required_on`, so
//! a future completion can never retroactively mark a past day as not-due.
//! The predicates additionally ignore later-dated completions defensively.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};

use super::resolve::{DependencyBindings, DependencyTarget};
use super::spec::{HabitSpec, IntervalUnit, PeriodUnit};

/// Sentinel returned by [`HabitSpec::next_due_offset`] when a specification
/// is not due within the lookahead bound
pub const NOT_DUE_SOON: u32 = 999;

/// Forward-scan bound for the next-due finder. Deliberately stops short of a
/// full year: a yearly interval completed today reports "not due soon"
/// instead of an exact date.
const NEXT_DUE_LOOKAHEAD_DAYS: u32 = 365;

impl HabitSpec {
    /// Returns true if the habit requires a completion on `day`.
    ///
    /// `completions` must be ascending and, for point-in-time correctness,
    /// contain only timestamps dated on or before `day`.
    pub fn is_due_on(
        &self,
        day: NaiveDate,
        completions: &[NaiveDateTime],
        deps: &DependencyBindings,
    ) -> bool {
        match self {
            HabitSpec::Interval { every, unit } => {
                match last_completion_on_or_before(completions, day) {
                    None => true,
                    Some(last) => match add_unit(last.date(), *every, *unit) {
                        Some(next) => next <= day,
                        None => false,
                    },
                }
            }

            HabitSpec::Frequency { count, per } => {
                completions_in_period(completions, day, *per) < *count
            }

            HabitSpec::SlidingWindow { count, window_days } => {
                completions_in_window(completions, day, *window_days) < *count
            }

            HabitSpec::Weekday(weekday) => {
                day.weekday() == *weekday && self.completed_on(day, completions) == 0
            }

            HabitSpec::MonthlyDate { day: dom } => {
                day.day() == clamp_day_of_month(day.year(), day.month(), *dom)
                    && self.completed_on(day, completions) == 0
            }

            HabitSpec::YearlyDate { month, day: dom } => {
                day.month() == *month
                    && day.day() == clamp_day_of_month(day.year(), *month, *dom)
                    && self.completed_on(day, completions) == 0
            }

            // Calendar-anchored to the first day of the named month; see
            // DESIGN.md for the compatibility note on this rule.
            HabitSpec::YearlyMonth { month } => {
                day.month() == *month
                    && day.day() == 1
                    && self.completed_on(day, completions) == 0
            }

            HabitSpec::HashDependency { target, count } => dependency_due(
                &DependencyTarget::Habit(target.clone()),
                *count,
                day,
                completions,
                deps,
            ),

            HabitSpec::TagDependency { tag, count } => dependency_due(
                &DependencyTarget::Tag(tag.clone()),
                *count,
                day,
                completions,
                deps,
            ),

            HabitSpec::Composite(specs) => {
                specs.iter().any(|spec| spec.is_due_on(day, completions, deps))
            }

            HabitSpec::Discontinued => false,
        }
    }

    /// Number of completions whose local calendar date equals `day`
    pub fn completed_on(&self, day: NaiveDate, completions: &[NaiveDateTime]) -> u32 {
        match self {
            HabitSpec::Discontinued => 0,
            HabitSpec::Interval { .. }
            | HabitSpec::Frequency { .. }
            | HabitSpec::SlidingWindow { .. }
            | HabitSpec::Weekday(_)
            | HabitSpec::MonthlyDate { .. }
            | HabitSpec::YearlyDate { .. }
            | HabitSpec::YearlyMonth { .. }
            | HabitSpec::HashDependency { .. }
            | HabitSpec::TagDependency { .. }
            | HabitSpec::Composite(_) => {
                completions.iter().filter(|c| c.date() == day).count() as u32
            }
        }
    }

    /// How many completions `day` demands: the full quota for per-day
    /// frequency specs, otherwise one on a due day and zero on any other.
    pub fn required_on(
        &self,
        day: NaiveDate,
        completions: &[NaiveDateTime],
        deps: &DependencyBindings,
    ) -> u32 {
        match self {
            HabitSpec::Discontinued => 0,

            HabitSpec::Frequency {
                count,
                per: PeriodUnit::Day,
            } => *count,

            HabitSpec::Composite(specs) => specs
                .iter()
                .map(|spec| spec.required_on(day, completions, deps))
                .max()
                .unwrap_or(0),

            HabitSpec::Interval { .. }
            | HabitSpec::Frequency { .. }
            | HabitSpec::SlidingWindow { .. }
            | HabitSpec::Weekday(_)
            | HabitSpec::MonthlyDate { .. }
            | HabitSpec::YearlyDate { .. }
            | HabitSpec::YearlyMonth { .. }
            | HabitSpec::HashDependency { .. }
            | HabitSpec::TagDependency { .. } => {
                if self.is_due_on(day, completions, deps) {
                    1
                } else {
                    0
                }
            }
        }
    }

    /// Returns true if `day` falls inside the interval window opened by a
    /// prior completion: satisfied without being a due day. Only interval
    /// specifications (and composites containing one) cover days.
    pub fn is_covered_on(&self, day: NaiveDate, completions: &[NaiveDateTime]) -> bool {
        match self {
            HabitSpec::Interval { every, unit } => {
                match last_completion_on_or_before(completions, day) {
                    None => false,
                    Some(last) => match add_unit(last.date(), *every, *unit) {
                        Some(next) => day < next,
                        None => true,
                    },
                }
            }

            HabitSpec::Composite(specs) => {
                specs.iter().any(|spec| spec.is_covered_on(day, completions))
            }

            HabitSpec::Frequency { .. }
            | HabitSpec::SlidingWindow { .. }
            | HabitSpec::Weekday(_)
            | HabitSpec::MonthlyDate { .. }
            | HabitSpec::YearlyDate { .. }
            | HabitSpec::YearlyMonth { .. }
            | HabitSpec::HashDependency { .. }
            | HabitSpec::TagDependency { .. }
            | HabitSpec::Discontinued => false,
        }
    }

    /// Day offset from `from` (inclusive) until this specification is next
    /// due, or [`NOT_DUE_SOON`] if it is not due within the lookahead bound.
    pub fn next_due_offset(
        &self,
        from: NaiveDate,
        completions: &[NaiveDateTime],
        deps: &DependencyBindings,
    ) -> u32 {
        for offset in 0..NEXT_DUE_LOOKAHEAD_DAYS {
            let day = match from.checked_add_days(Days::new(offset as u64)) {
                Some(day) => day,
                None => break,
            };
            if self.is_due_on(day, completions, deps) {
                return offset;
            }
        }
        NOT_DUE_SOON
    }
}

/// Most recent completion dated on or before `day`
fn last_completion_on_or_before(
    completions: &[NaiveDateTime],
    day: NaiveDate,
) -> Option<NaiveDateTime> {
    completions.iter().rev().find(|c| c.date() <= day).copied()
}

/// Unit-aware date addition with month/year-end clamping
fn add_unit(date: NaiveDate, n: u32, unit: IntervalUnit) -> Option<NaiveDate> {
    match unit {
        IntervalUnit::Day => date.checked_add_days(Days::new(n as u64)),
        IntervalUnit::Week => date.checked_add_days(Days::new(7 * n as u64)),
        IntervalUnit::Month => date.checked_add_months(Months::new(n)),
        IntervalUnit::Year => n
            .checked_mul(12)
            .and_then(|months| date.checked_add_months(Months::new(months))),
    }
}

/// Monday-start week containing `date`
fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(date.weekday().num_days_from_monday() as u64))
        .unwrap_or(date)
}

fn completions_in_period(completions: &[NaiveDateTime], day: NaiveDate, per: PeriodUnit) -> u32 {
    completions
        .iter()
        .filter(|c| {
            let d = c.date();
            d <= day
                && match per {
                    PeriodUnit::Day => d == day,
                    PeriodUnit::Week => week_start(d) == week_start(day),
                    PeriodUnit::Month => d.year() == day.year() && d.month() == day.month(),
                }
        })
        .count() as u32
}

fn completions_in_window(completions: &[NaiveDateTime], day: NaiveDate, window_days: u32) -> u32 {
    let start = day
        .checked_sub_days(Days::new(window_days.saturating_sub(1) as u64))
        .unwrap_or(NaiveDate::MIN);
    completions
        .iter()
        .filter(|c| {
            let d = c.date();
            start <= d && d <= day
        })
        .count() as u32
}

/// Clamps a requested day-of-month to the month's actual last day
fn clamp_day_of_month(year: i32, month: u32, requested: u32) -> u32 {
    requested.min(days_in_month(year, month))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Due once `count` occurrences of `target` have accumulated strictly after
/// this habit's most recent completion (or since the start of history if it
/// was never completed). The counter resets on every completion.
fn dependency_due(
    target: &DependencyTarget,
    count: u32,
    day: NaiveDate,
    completions: &[NaiveDateTime],
    deps: &DependencyBindings,
) -> bool {
    let cutoff = last_completion_on_or_before(completions, day);
    let seen = deps
        .occurrences(target)
        .iter()
        .filter(|o| o.date() <= day && cutoff.map_or(true, |c| **o > c))
        .count() as u32;
    seen >= count
}
