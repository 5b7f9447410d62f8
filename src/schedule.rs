//! Recurrence expansion for medication schedules.
//!
//! A schedule is a set of hours-of-day crossed with an optional set of
//! weekdays, bounded by an optional date range. Expansion turns it into
//! the concrete occurrence instants inside a generation window. Pure
//! functions of their inputs; persistence happens in `materialize`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use thiserror::Error;

use crate::config::DEFAULT_GENERATION_WINDOW_DAYS;
use crate::models::MedicationSchedule;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("at least one hour of day is required")]
    EmptyHours,

    #[error("hour of day out of range: {0} (expected 0-23)")]
    HourOutOfRange(u32),

    #[error("day of week out of range: {0} (expected 0=Monday to 6=Sunday)")]
    DayOutOfRange(u32),

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// Deduplicate, sort and range-check hours of day.
pub fn normalize_hours(hours: &[u32]) -> Result<Vec<u32>, ScheduleError> {
    if hours.is_empty() {
        return Err(ScheduleError::EmptyHours);
    }
    if let Some(&bad) = hours.iter().find(|h| **h > 23) {
        return Err(ScheduleError::HourOutOfRange(bad));
    }
    let mut normalized = hours.to_vec();
    normalized.sort_unstable();
    normalized.dedup();
    Ok(normalized)
}

/// Deduplicate, sort and range-check days of week (0 = Monday).
/// An empty set collapses to None, meaning "every day".
pub fn normalize_days(days: Option<&[u32]>) -> Result<Option<Vec<u32>>, ScheduleError> {
    let Some(days) = days else { return Ok(None) };
    if days.is_empty() {
        return Ok(None);
    }
    if let Some(&bad) = days.iter().find(|d| **d > 6) {
        return Err(ScheduleError::DayOutOfRange(bad));
    }
    let mut normalized = days.to_vec();
    normalized.sort_unstable();
    normalized.dedup();
    Ok(Some(normalized))
}

pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ScheduleError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ScheduleError::EndBeforeStart { start, end });
        }
    }
    Ok(())
}

/// Check a stored schedule without rewriting it. Used before expansion so
/// malformed rows are rejected up front, with no partial state.
pub fn validate_schedule(schedule: &MedicationSchedule) -> Result<(), ScheduleError> {
    if schedule.hours.is_empty() {
        return Err(ScheduleError::EmptyHours);
    }
    if let Some(&bad) = schedule.hours.iter().find(|h| **h > 23) {
        return Err(ScheduleError::HourOutOfRange(bad));
    }
    if let Some(days) = &schedule.days_of_week {
        if let Some(&bad) = days.iter().find(|d| **d > 6) {
            return Err(ScheduleError::DayOutOfRange(bad));
        }
    }
    validate_date_range(schedule.start_date, schedule.end_date)
}

/// Default generation window: 7 calendar days starting today, inclusive.
pub fn default_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today, today + Duration::days(DEFAULT_GENERATION_WINDOW_DAYS - 1))
}

/// Expand a schedule over `[window_start, window_end]` (both inclusive)
/// into occurrence instants, strictly ascending.
///
/// The effective range is the intersection of the window with the
/// schedule's own date bounds; a missing end date is capped at
/// `window_start + 7 days` so an open-ended schedule never explodes into
/// unbounded reminders. An empty intersection yields an empty vec.
/// Instants already in the past are still emitted; downstream consumers
/// see them as overdue rather than silently losing doses.
pub fn expand(
    schedule: &MedicationSchedule,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<DateTime<Utc>> {
    let sched_start = schedule.start_date.unwrap_or(window_start);
    let sched_end = schedule
        .end_date
        .unwrap_or(window_start + Duration::days(DEFAULT_GENERATION_WINDOW_DAYS));

    let start = window_start.max(sched_start);
    let end = window_end.min(sched_end);
    if start > end {
        return Vec::new();
    }

    let mut occurrences = Vec::new();
    let mut day = start;
    while day <= end {
        let weekday = day.weekday().num_days_from_monday();
        let day_matches = match &schedule.days_of_week {
            Some(days) if !days.is_empty() => days.contains(&weekday),
            _ => true,
        };
        if day_matches {
            for &hour in &schedule.hours {
                if let Some(at) = day.and_hms_opt(hour, 0, 0) {
                    occurrences.push(at.and_utc());
                }
            }
        }
        day += Duration::days(1);
    }

    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn schedule(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        hours: Vec<u32>,
        days_of_week: Option<Vec<u32>>,
    ) -> MedicationSchedule {
        MedicationSchedule {
            id: Uuid::new_v4(),
            medication_id: Uuid::new_v4(),
            start_date,
            end_date,
            hours,
            days_of_week,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn normalize_hours_sorts_and_dedups() {
        assert_eq!(normalize_hours(&[20, 8, 14, 8]).unwrap(), vec![8, 14, 20]);
    }

    #[test]
    fn normalize_hours_rejects_out_of_range() {
        assert_eq!(
            normalize_hours(&[8, 24]),
            Err(ScheduleError::HourOutOfRange(24))
        );
        assert_eq!(normalize_hours(&[]), Err(ScheduleError::EmptyHours));
    }

    #[test]
    fn normalize_days_empty_means_every_day() {
        assert_eq!(normalize_days(Some(&[])).unwrap(), None);
        assert_eq!(normalize_days(None).unwrap(), None);
        assert_eq!(
            normalize_days(Some(&[6, 0, 6])).unwrap(),
            Some(vec![0, 6])
        );
        assert_eq!(
            normalize_days(Some(&[7])),
            Err(ScheduleError::DayOutOfRange(7))
        );
    }

    #[test]
    fn date_range_end_before_start_rejected() {
        let start = date(2025, 3, 10);
        let end = date(2025, 3, 9);
        assert_eq!(
            validate_date_range(Some(start), Some(end)),
            Err(ScheduleError::EndBeforeStart { start, end })
        );
        assert!(validate_date_range(Some(start), None).is_ok());
    }

    #[test]
    fn expands_every_day_when_no_weekday_filter() {
        // 3-day window, 2 hours per day
        let s = schedule(None, None, vec![8, 20], None);
        let out = expand(&s, date(2025, 3, 10), date(2025, 3, 12));
        assert_eq!(out.len(), 6);
        assert_eq!(out[0], date(2025, 3, 10).and_hms_opt(8, 0, 0).unwrap().and_utc());
        assert_eq!(out[5], date(2025, 3, 12).and_hms_opt(20, 0, 0).unwrap().and_utc());
    }

    #[test]
    fn occurrence_count_is_matching_days_times_hours() {
        // Mon-Fri at 8 and 20, Monday 2025-03-10 through Sunday 2025-03-16:
        // 5 weekdays x 2 hours = 10 occurrences, none on the weekend.
        let monday = date(2025, 3, 10);
        let sunday = date(2025, 3, 16);
        let s = schedule(
            Some(monday),
            None,
            vec![8, 20],
            Some(vec![0, 1, 2, 3, 4]),
        );
        let out = expand(&s, monday, sunday);
        assert_eq!(out.len(), 10);
        for at in &out {
            let wd = at.date_naive().weekday().num_days_from_monday();
            assert!(wd <= 4, "occurrence landed on weekend: {at}");
        }
    }

    #[test]
    fn strictly_ascending_and_unique() {
        let s = schedule(None, None, vec![8, 14, 20], Some(vec![0, 2, 4]));
        let out = expand(&s, date(2025, 3, 10), date(2025, 3, 23));
        for pair in out.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn empty_effective_window_yields_empty_sequence() {
        // Schedule ended before the window opens
        let s = schedule(
            Some(date(2025, 1, 1)),
            Some(date(2025, 1, 31)),
            vec![8],
            None,
        );
        let out = expand(&s, date(2025, 3, 10), date(2025, 3, 16));
        assert!(out.is_empty());
    }

    #[test]
    fn window_clipped_by_schedule_dates() {
        // Schedule covers only the middle of the window
        let s = schedule(
            Some(date(2025, 3, 12)),
            Some(date(2025, 3, 13)),
            vec![9],
            None,
        );
        let out = expand(&s, date(2025, 3, 10), date(2025, 3, 16));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date_naive(), date(2025, 3, 12));
        assert_eq!(out[1].date_naive(), date(2025, 3, 13));
    }

    #[test]
    fn open_end_date_capped_at_seven_days_past_window_start() {
        let s = schedule(Some(date(2025, 3, 10)), None, vec![8], None);
        // Window far longer than the cap
        let out = expand(&s, date(2025, 3, 10), date(2025, 4, 30));
        assert_eq!(out.len(), 8); // 2025-03-10 through 2025-03-17 inclusive
        assert_eq!(out.last().unwrap().date_naive(), date(2025, 3, 17));
    }

    #[test]
    fn past_occurrences_still_emitted() {
        // Expansion is a pure function of the window; "now" plays no part.
        let s = schedule(None, None, vec![8], None);
        let out = expand(&s, date(2020, 1, 1), date(2020, 1, 3));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn default_window_spans_seven_days() {
        let (from, to) = default_window(date(2025, 3, 10));
        assert_eq!(from, date(2025, 3, 10));
        assert_eq!(to, date(2025, 3, 16));
    }

    #[test]
    fn validate_schedule_flags_bad_rows() {
        let mut s = schedule(None, None, vec![8], Some(vec![9]));
        assert_eq!(
            validate_schedule(&s),
            Err(ScheduleError::DayOutOfRange(9))
        );
        s.days_of_week = None;
        s.hours = vec![];
        assert_eq!(validate_schedule(&s), Err(ScheduleError::EmptyHours));
    }
}
