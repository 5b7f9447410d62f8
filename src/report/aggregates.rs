//! Assembles the full senior health report for a date period.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};

use super::activity::{most_active_hours, profile_activity};
use super::adherence::{compute_intake_stats, medication_adherence, overall_adherence};
use super::fetch::{fetch_appointments_summary, fetch_care_team_activity, fetch_reminder_stats};
use super::insights::generate_insights;
use super::types::{IntakeStats, SeniorHealthReport};

fn period_bounds(period_start: NaiveDate, period_end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let from = period_start
        .and_hms_opt(0, 0, 0)
        .map(|at| at.and_utc())
        .unwrap_or_default();
    let to = period_end
        .and_hms_opt(23, 59, 59)
        .map(|at| at.and_utc())
        .unwrap_or_default();
    (from, to)
}

/// Build the complete health report for one senior over
/// `[period_start, period_end]` (inclusive calendar dates).
///
/// Fails whole: if any sub-aggregation errors, no report is returned,
/// so insights are never derived from partially populated figures.
pub fn generate_senior_health_report(
    conn: &Connection,
    senior_id: &Uuid,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<SeniorHealthReport, DatabaseError> {
    let senior = repository::get_senior(conn, senior_id)?
        .ok_or_else(|| DatabaseError::not_found("senior", senior_id))?;

    let (from, to) = period_bounds(period_start, period_end);

    let medications = repository::list_medications_for_senior(conn, senior_id)?;
    let logs = repository::list_intake_logs(conn, senior_id, Some(&from), Some(&to))?;
    let medications_detail = medication_adherence(&medications, &logs);
    let medication_adherence = overall_adherence(&medications_detail);

    let appointments_summary = fetch_appointments_summary(conn, senior_id, &from, &to)?;
    let reminder_stats = fetch_reminder_stats(conn, senior_id, &from, &to)?;

    let appointments = repository::list_appointments_in_period(conn, senior_id, &from, &to)?;
    let reminders = repository::list_reminders_in_range(conn, senior_id, &from, &to)?;
    let activity_by_hour = profile_activity(&logs, &appointments, &reminders, &from, &to);
    let most_active_hours = most_active_hours(&activity_by_hour);

    let care_team_activity = fetch_care_team_activity(conn, senior_id, &from, &to)?;

    let insights = generate_insights(
        medication_adherence,
        &medications_detail,
        &appointments_summary,
        &reminder_stats,
        &care_team_activity,
    );

    tracing::debug!(
        senior = %senior.full_name,
        medications = medications_detail.len(),
        insights = insights.len(),
        "health report assembled for {period_start}..{period_end}"
    );

    Ok(SeniorHealthReport {
        senior_id: *senior_id,
        senior_name: senior.full_name,
        period_start,
        period_end,
        total_medications: medications_detail.len() as u32,
        medication_adherence,
        medications_detail,
        appointments_summary,
        total_reminders: reminder_stats.total,
        completed_reminders: reminder_stats.completed,
        activity_by_hour,
        most_active_hours,
        care_team_activity,
        insights,
    })
}

/// Flat intake counters for one senior over `[period_start, period_end]`.
pub fn compute_senior_intake_stats(
    conn: &Connection,
    senior_id: &Uuid,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<IntakeStats, DatabaseError> {
    if repository::get_senior(conn, senior_id)?.is_none() {
        return Err(DatabaseError::not_found("senior", senior_id));
    }
    let (from, to) = period_bounds(period_start, period_end);
    let logs = repository::list_intake_logs(conn, senior_id, Some(&from), Some(&to))?;
    Ok(compute_intake_stats(&logs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::clock::FixedClock;
    use crate::db::sqlite::open_memory_database;
    use crate::intake::IntakeResolution;
    use crate::medications::{self, MedicationInput};
    use crate::models::{SeniorProfile, User, UserRole};
    use crate::reminders;

    fn seed_senior(conn: &Connection, name: &str) -> Uuid {
        let senior = SeniorProfile {
            id: Uuid::new_v4(),
            full_name: name.into(),
            birthdate: None,
            conditions: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
        };
        repository::insert_senior(conn, &senior).unwrap();
        senior.id
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn unknown_senior_fails_whole_report() {
        let conn = open_memory_database().unwrap();
        let err = generate_senior_health_report(&conn, &Uuid::new_v4(), date(10), date(16))
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn empty_period_produces_quiet_report() {
        let conn = open_memory_database().unwrap();
        let senior_id = seed_senior(&conn, "Carmen Diaz");

        let report =
            generate_senior_health_report(&conn, &senior_id, date(10), date(16)).unwrap();
        assert_eq!(report.senior_name, "Carmen Diaz");
        assert_eq!(report.total_medications, 0);
        assert_eq!(report.medication_adherence, 0.0);
        assert_eq!(report.activity_by_hour.len(), 24);
        assert!(report.insights.is_empty());
    }

    #[test]
    fn full_week_report_end_to_end() {
        let conn = open_memory_database().unwrap();
        let senior_id = seed_senior(&conn, "Carmen Diaz");
        let actor = User {
            id: Uuid::new_v4(),
            full_name: "Lucia Diaz".into(),
            role: UserRole::Caregiver,
        };
        repository::insert_user(&conn, &actor).unwrap();

        // Monday 2025-03-10, schedule at 08:00 and 20:00 every day.
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap());
        let input = MedicationInput {
            name: "Metformin".into(),
            dose: "500".into(),
            unit: "mg".into(),
            notes: None,
            start_date: None,
            end_date: None,
            hours: Some(vec![8, 20]),
            days_of_week: None,
        };
        let med =
            medications::create_medication(&conn, &clock, &senior_id, &input, Some(&actor.id))
                .unwrap();

        // Monday: both doses taken on time via reminder completion.
        let monday = date(10);
        for reminder in reminders::list_reminders_by_date(&conn, &senior_id, monday).unwrap() {
            let at_time = FixedClock(reminder.scheduled_at + chrono::Duration::minutes(10));
            reminders::mark_done(&conn, &at_time, &reminder.id, &actor.id).unwrap();
        }

        // Tuesday morning: skipped explicitly.
        let tue_morning = Utc.with_ymd_and_hms(2025, 3, 11, 8, 0, 0).unwrap();
        let tue_clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 11, 9, 0, 0).unwrap());
        medications::log_intake(
            &conn,
            &tue_clock,
            &med.id,
            &tue_morning,
            IntakeResolution::Skipped,
            Some(&actor.id),
        )
        .unwrap();

        // Tuesday evening onward: swept as missed at end of Wednesday.
        let sweep_clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 12, 23, 30, 0).unwrap());
        let swept = reminders::sweep_missed_intakes(&conn, &sweep_clock, &senior_id).unwrap();
        assert_eq!(swept, 3); // Tue 20:00, Wed 08:00, Wed 20:00

        let report =
            generate_senior_health_report(&conn, &senior_id, date(10), date(16)).unwrap();

        assert_eq!(report.total_medications, 1);
        let detail = &report.medications_detail[0];
        assert_eq!(detail.taken, 2);
        assert_eq!(detail.missed, 4); // 1 skipped + 3 swept
        assert_eq!(detail.total_doses, 6);
        assert!((report.medication_adherence - 2.0 / 6.0).abs() < 1e-9);

        assert_eq!(report.total_reminders, 14);
        assert_eq!(report.completed_reminders, 2);

        // Doses land in buckets 8 and 20; reminders dominate both.
        assert_eq!(report.most_active_hours[0], 8);
        assert_eq!(report.most_active_hours[1], 20);

        // Low adherence plus the offending medication, in that order.
        assert!(report.insights[0].contains("Low medication adherence"));
        assert!(report.insights[1].contains("Metformin"));

        let stats =
            compute_senior_intake_stats(&conn, &senior_id, date(10), date(16)).unwrap();
        assert_eq!(stats.total_intakes, 6);
        assert_eq!(stats.taken, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.missed, 3);
        assert_eq!(stats.adherence_rate, 2.0 / 6.0);
    }
}
