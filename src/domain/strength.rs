//! Compliance scoring
//!
//! Strength is the fraction of obligation-bearing days in a window that were
//! satisfied. A day bears obligation when the habit is due on it or a
//! completion landed on it anyway (done ahead of schedule); it is satisfied
//! when not due (vacuously) or when that day's completions meet the
//! required quota. Each day is judged point-in-time: only completions dated
//! on or before it reach the due/required predicates.

use chrono::{Days, NaiveDate, NaiveDateTime};

use super::resolve::DependencyBindings;
use super::spec::HabitSpec;

/// Compliance over a day range, in `[0.0, 1.0]`.
///
/// `window_days == 0` means all-time: the range starts at the first
/// completion's date (no completions at all scores `0.0`). Otherwise the
/// range is the trailing `window_days` days ending at `as_of`, clamped to
/// not start before the first completion. A range with no obligation-bearing
/// days scores `1.0`: the habit imposed nothing, so nothing was missed.
pub fn strength(
    spec: &HabitSpec,
    completions: &[NaiveDateTime],
    window_days: u32,
    as_of: NaiveDate,
    deps: &DependencyBindings,
) -> f64 {
    let first_day = completions.first().map(|c| c.date());

    let start = if window_days == 0 {
        match first_day {
            Some(day) => day,
            None => return 0.0,
        }
    } else {
        let window_start = as_of
            .checked_sub_days(Days::new(window_days.saturating_sub(1) as u64))
            .unwrap_or(NaiveDate::MIN);
        match first_day {
            Some(first) => window_start.max(first),
            None => window_start,
        }
    };

    let mut day = start;
    let mut upto = 0usize;
    let mut obliged = 0u32;
    let mut satisfied = 0u32;

    while day <= as_of {
        while upto < completions.len() && completions[upto].date() <= day {
            upto += 1;
        }
        let known = &completions[..upto];

        let done_today = spec.completed_on(day, known);
        let due = spec.is_due_on(day, known, deps);

        if due || done_today > 0 {
            obliged += 1;
            if !due || done_today >= spec.required_on(day, known, deps).max(1) {
                satisfied += 1;
            }
        }

        day = match day.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    if obliged == 0 {
        return 1.0;
    }
    f64::from(satisfied) / f64::from(obliged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resolve::DependencyTarget;
    use crate::domain::spec::{IntervalUnit, PeriodUnit};
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at_day(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn no_deps() -> DependencyBindings {
        DependencyBindings::new()
    }

    #[test]
    fn all_time_with_no_completions_is_zero() {
        let specs = [
            HabitSpec::Interval { every: 1, unit: IntervalUnit::Day },
            HabitSpec::Frequency { count: 1, per: PeriodUnit::Day },
            HabitSpec::Weekday(Weekday::Mon),
            HabitSpec::Discontinued,
        ];
        for spec in &specs {
            assert_eq!(strength(spec, &[], 0, date("2026-03-10"), &no_deps()), 0.0);
        }
    }

    #[test]
    fn daily_interval_fully_completed_is_one() {
        let spec = HabitSpec::Interval { every: 1, unit: IntervalUnit::Day };
        let done: Vec<_> = (1..=10).map(at_day).collect();
        let s = strength(&spec, &done, 0, date("2026-03-10"), &no_deps());
        assert_eq!(s, 1.0);
    }

    #[test]
    fn alternating_daily_frequency_is_half() {
        let spec = HabitSpec::Frequency { count: 1, per: PeriodUnit::Day };
        // completed on 5 of 10 days
        let done: Vec<_> = [1, 3, 5, 7, 9].into_iter().map(at_day).collect();
        let s = strength(&spec, &done, 0, date("2026-03-10"), &no_deps());
        assert!((s - 0.5).abs() < 0.1, "strength was {}", s);
    }

    #[test]
    fn trailing_window_over_full_history_is_one() {
        let spec = HabitSpec::Interval { every: 1, unit: IntervalUnit::Day };
        let done: Vec<_> = (1..=10).map(at_day).collect();
        let s = strength(&spec, &done, 7, date("2026-03-10"), &no_deps());
        assert_eq!(s, 1.0);
    }

    #[test]
    fn trailing_window_catches_recent_misses() {
        let spec = HabitSpec::Interval { every: 1, unit: IntervalUnit::Day };
        // completed days 1-5, then nothing through day 10
        let done: Vec<_> = (1..=5).map(at_day).collect();
        let s = strength(&spec, &done, 7, date("2026-03-10"), &no_deps());
        assert!(s < 0.5, "strength was {}", s);
    }

    #[test]
    fn window_clamps_to_first_completion() {
        let spec = HabitSpec::Interval { every: 1, unit: IntervalUnit::Day };
        // history starts day 8; a 30-day window must not penalize the days
        // before the habit existed
        let done: Vec<_> = (8..=10).map(at_day).collect();
        let s = strength(&spec, &done, 30, date("2026-03-10"), &no_deps());
        assert_eq!(s, 1.0);
    }

    #[test]
    fn weekday_half_completed_is_half() {
        let spec = HabitSpec::Weekday(Weekday::Mon);
        // Mondays in range 2026-03-02..=2026-03-23: 2nd, 9th, 16th, 23rd;
        // completed on two of them
        let done = vec![at_day(2), at_day(16)];
        let s = strength(&spec, &done, 22, date("2026-03-23"), &no_deps());
        assert!((s - 0.5).abs() < 0.05, "strength was {}", s);
    }

    #[test]
    fn no_due_days_in_range_is_fully_compliant() {
        // weekly interval completed on day 1; next 3 days impose nothing
        let spec = HabitSpec::Interval { every: 1, unit: IntervalUnit::Week };
        let done = vec![at_day(1)];
        let s = strength(&spec, &done, 3, date("2026-03-04"), &no_deps());
        assert_eq!(s, 1.0);
    }

    #[test]
    fn future_completion_does_not_mask_missed_day() {
        let spec = HabitSpec::Interval { every: 1, unit: IntervalUnit::Day };
        // missed days 2-3, completed day 4; those days must stay missed
        let done = vec![at_day(1), at_day(4)];
        let s = strength(&spec, &done, 0, date("2026-03-04"), &no_deps());
        assert_eq!(s, 0.5); // days 1 and 4 satisfied, days 2 and 3 missed
    }

    #[test]
    fn per_day_quota_must_be_met() {
        let spec = HabitSpec::Frequency { count: 2, per: PeriodUnit::Day };
        // one completion on a day requiring two: due all day, quota unmet
        let done = vec![at_day(1)];
        let s = strength(&spec, &done, 0, date("2026-03-01"), &no_deps());
        assert_eq!(s, 0.0);
    }

    #[test]
    fn tag_dependency_scores_through_bindings() {
        let spec = HabitSpec::TagDependency { tag: "gym".to_string(), count: 1 };
        let mut deps = DependencyBindings::new();
        deps.bind(DependencyTarget::Tag("gym".to_string()), vec![at_day(2)]);

        // completed day 1; the gym occurrence on day 2 makes the habit due
        // until the completion on day 3 resets the counter
        let done = vec![at_day(1), at_day(3)];
        let s = strength(&spec, &done, 0, date("2026-03-04"), &deps);
        // day 1: completed, not due -> satisfied
        // day 2: due, not completed -> missed
        // day 3: completed, counter reset -> satisfied
        // day 4: not due -> no obligation
        assert!((s - (2.0 / 3.0)).abs() < 1e-9, "strength was {}", s);
    }
}
