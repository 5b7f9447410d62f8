//! Reminder service — ad-hoc reminders, completion, and the missed sweep.
//!
//! Completing a medication-linked reminder is the main intake entry
//! point: the completion instant is classified against the scheduled
//! time and the intake log written in the same call. The sweep is the
//! end-of-day collaborator that turns silently elapsed occurrences into
//! MISSED history.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::clock::Clock;
use crate::db::{repository, DatabaseError};
use crate::intake::{self, IntakeResolution};
use crate::models::{IntakeLog, Reminder, ReminderStatus};

/// Input for an ad-hoc reminder (doctor visit prep, hydration, etc.).
/// Medication reminders are materialized from schedules instead.
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderInput {
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
}

pub fn create_reminder(
    conn: &Connection,
    senior_id: &Uuid,
    input: &ReminderInput,
) -> Result<Reminder, DatabaseError> {
    if repository::get_senior(conn, senior_id)?.is_none() {
        return Err(DatabaseError::not_found("senior", senior_id));
    }
    let reminder = Reminder {
        id: Uuid::new_v4(),
        senior_id: *senior_id,
        title: input.title.clone(),
        description: input.description.clone(),
        scheduled_at: input.scheduled_at,
        status: ReminderStatus::Pending,
        done_at: None,
        medication_id: None,
        actor_user_id: None,
    };
    repository::insert_reminder(conn, &reminder)?;
    Ok(reminder)
}

/// Reminders scheduled on one UTC calendar day, ascending.
pub fn list_reminders_by_date(
    conn: &Connection,
    senior_id: &Uuid,
    day: NaiveDate,
) -> Result<Vec<Reminder>, DatabaseError> {
    let start = day
        .and_hms_opt(0, 0, 0)
        .map(|at| at.and_utc())
        .unwrap_or_default();
    let end = start + Duration::days(1);
    repository::list_reminders_in_range(conn, senior_id, &start, &end)
}

/// Complete a reminder. For medication reminders the completion is also
/// classified and logged as an intake, unless that occurrence was
/// already resolved through another path.
pub fn mark_done(
    conn: &Connection,
    clock: &dyn Clock,
    reminder_id: &Uuid,
    actor_user_id: &Uuid,
) -> Result<Reminder, DatabaseError> {
    let reminder = repository::get_reminder(conn, reminder_id)?
        .ok_or_else(|| DatabaseError::not_found("reminder", reminder_id))?;
    if reminder.status == ReminderStatus::Cancelled {
        return Err(DatabaseError::ConstraintViolation(format!(
            "reminder {reminder_id} is cancelled"
        )));
    }

    let now = clock.now();
    repository::set_reminder_done(conn, reminder_id, &now, Some(actor_user_id))?;

    if let Some(medication_id) = reminder.medication_id {
        if repository::intake_exists(conn, &medication_id, &reminder.scheduled_at)? {
            tracing::warn!(
                reminder = %reminder_id,
                "occurrence already logged, skipping intake write"
            );
        } else {
            let status =
                intake::classify(reminder.scheduled_at, IntakeResolution::Taken(now), now)?;
            let log = IntakeLog {
                id: Uuid::new_v4(),
                senior_id: reminder.senior_id,
                medication_id,
                scheduled_at: reminder.scheduled_at,
                taken_at: Some(now),
                status,
                actor_user_id: Some(*actor_user_id),
            };
            repository::insert_intake_log(conn, &log)?;
        }
    }

    repository::record_action(
        conn,
        &now,
        Some(actor_user_id),
        "DONE",
        "Reminder",
        &reminder_id.to_string(),
        None,
    )?;

    repository::get_reminder(conn, reminder_id)?
        .ok_or_else(|| DatabaseError::not_found("reminder", reminder_id))
}

pub fn cancel_reminder(conn: &Connection, reminder_id: &Uuid) -> Result<(), DatabaseError> {
    repository::set_reminder_cancelled(conn, reminder_id)
}

/// End-of-day sweep: write a MISSED intake log for every pending
/// medication reminder whose scheduled time has elapsed and that has no
/// log yet. Returns how many occurrences were marked.
pub fn sweep_missed_intakes(
    conn: &Connection,
    clock: &dyn Clock,
    senior_id: &Uuid,
) -> Result<usize, DatabaseError> {
    let now = clock.now();
    let pending = repository::list_pending_medication_reminders_before(conn, senior_id, &now)?;

    let mut marked = 0;
    for reminder in pending {
        let Some(medication_id) = reminder.medication_id else {
            continue;
        };
        if repository::intake_exists(conn, &medication_id, &reminder.scheduled_at)? {
            continue;
        }
        let status = intake::classify(reminder.scheduled_at, IntakeResolution::Elapsed, now)?;
        let log = IntakeLog {
            id: Uuid::new_v4(),
            senior_id: *senior_id,
            medication_id,
            scheduled_at: reminder.scheduled_at,
            taken_at: None,
            status,
            actor_user_id: None,
        };
        repository::insert_intake_log(conn, &log)?;
        marked += 1;
    }

    if marked > 0 {
        tracing::info!(senior = %senior_id, marked, "missed-intake sweep");
    }
    Ok(marked)
}
