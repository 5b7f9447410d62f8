//! Hour-of-day activity profiling.
//!
//! Buckets the period's events by the hour they happened: intakes by
//! when the dose was actually taken, appointments by their start,
//! reminders by their scheduled time.

use chrono::{DateTime, Timelike, Utc};

use crate::models::{Appointment, IntakeLog, IntakeStatus, Reminder};

use super::types::ActivityBucket;

/// Count events into 24 hour-of-day buckets. Only TAKEN intakes count,
/// and only events inside `[from, to]`.
pub fn profile_activity(
    intakes: &[IntakeLog],
    appointments: &[Appointment],
    reminders: &[Reminder],
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Vec<ActivityBucket> {
    let in_period = |at: &DateTime<Utc>| at >= from && at <= to;

    let mut buckets: Vec<ActivityBucket> = (0..24)
        .map(|hour| ActivityBucket {
            hour,
            medication_intakes: 0,
            appointments: 0,
            reminders: 0,
        })
        .collect();

    for intake in intakes {
        if intake.status != IntakeStatus::Taken {
            continue;
        }
        if let Some(taken_at) = intake.taken_at {
            if in_period(&taken_at) {
                buckets[taken_at.hour() as usize].medication_intakes += 1;
            }
        }
    }
    for appt in appointments {
        if in_period(&appt.starts_at) {
            buckets[appt.starts_at.hour() as usize].appointments += 1;
        }
    }
    for reminder in reminders {
        if in_period(&reminder.scheduled_at) {
            buckets[reminder.scheduled_at.hour() as usize].reminders += 1;
        }
    }

    buckets
}

/// The three busiest hours by combined count. Stable descending sort,
/// so ties resolve toward the lower hour.
pub fn most_active_hours(buckets: &[ActivityBucket]) -> Vec<u32> {
    let mut ranked: Vec<&ActivityBucket> = buckets.iter().collect();
    ranked.sort_by(|a, b| b.combined().cmp(&a.combined()));
    ranked.iter().take(3).map(|b| b.hour).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    use crate::models::{AppointmentStatus, ReminderStatus};

    fn at(d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, min, 0).unwrap()
    }

    fn taken_intake(taken_at: DateTime<Utc>) -> IntakeLog {
        IntakeLog {
            id: Uuid::new_v4(),
            senior_id: Uuid::new_v4(),
            medication_id: Uuid::new_v4(),
            scheduled_at: taken_at,
            taken_at: Some(taken_at),
            status: IntakeStatus::Taken,
            actor_user_id: None,
        }
    }

    fn appointment(starts_at: DateTime<Utc>) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            senior_id: Uuid::new_v4(),
            doctor_user_id: Uuid::new_v4(),
            starts_at,
            location: None,
            reason: None,
            status: AppointmentStatus::Scheduled,
        }
    }

    fn reminder(scheduled_at: DateTime<Utc>) -> Reminder {
        Reminder {
            id: Uuid::new_v4(),
            senior_id: Uuid::new_v4(),
            title: "Take Metformin".into(),
            description: None,
            scheduled_at,
            status: ReminderStatus::Pending,
            done_at: None,
            medication_id: None,
            actor_user_id: None,
        }
    }

    fn period() -> (DateTime<Utc>, DateTime<Utc>) {
        (at(1, 0, 0), at(31, 23, 59))
    }

    #[test]
    fn events_in_same_hour_share_a_bucket() {
        let (from, to) = period();
        let buckets = profile_activity(
            &[taken_intake(at(10, 8, 15))],
            &[appointment(at(10, 8, 45))],
            &[],
            &from,
            &to,
        );
        assert_eq!(buckets[8].medication_intakes, 1);
        assert_eq!(buckets[8].appointments, 1);
        assert_eq!(buckets[8].combined(), 2);
        assert_eq!(buckets[9].combined(), 0);
    }

    #[test]
    fn busiest_hour_ranks_first() {
        let (from, to) = period();
        let buckets = profile_activity(
            &[taken_intake(at(10, 8, 15))],
            &[appointment(at(10, 8, 45))],
            &[reminder(at(10, 20, 0))],
            &from,
            &to,
        );
        let top = most_active_hours(&buckets);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0], 8);
        assert_eq!(top[1], 20);
    }

    #[test]
    fn ties_resolve_to_lower_hour() {
        let (from, to) = period();
        let buckets = profile_activity(
            &[],
            &[],
            &[reminder(at(10, 14, 0)), reminder(at(10, 9, 0))],
            &from,
            &to,
        );
        let top = most_active_hours(&buckets);
        assert_eq!(top[0], 9);
        assert_eq!(top[1], 14);
        // the third slot falls back to the lowest empty hour
        assert_eq!(top[2], 0);
    }

    #[test]
    fn non_taken_intakes_do_not_count() {
        let (from, to) = period();
        let mut missed = taken_intake(at(10, 8, 0));
        missed.status = IntakeStatus::Missed;
        missed.taken_at = None;
        let buckets = profile_activity(&[missed], &[], &[], &from, &to);
        assert_eq!(buckets[8].medication_intakes, 0);
    }

    #[test]
    fn events_outside_period_are_ignored() {
        let from = at(10, 0, 0);
        let to = at(10, 23, 59);
        let buckets = profile_activity(
            &[taken_intake(at(11, 8, 0))],
            &[appointment(at(9, 8, 0))],
            &[],
            &from,
            &to,
        );
        assert_eq!(buckets[8].combined(), 0);
    }
}
