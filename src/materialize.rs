//! Reminder materialization.
//!
//! Turns expanded schedule occurrences into persisted PENDING reminders.
//! Re-running over the same window replaces the window's pending
//! reminders instead of stacking duplicates: pending rows for the
//! medication inside the window are deleted and the fresh set inserted,
//! all inside one transaction. DONE and CANCELLED reminders are history
//! and survive regeneration.

use chrono::NaiveDate;
use rusqlite::Connection;
use uuid::Uuid;

use crate::clock::Clock;
use crate::db::{repository, DatabaseError};
use crate::models::{Medication, MedicationSchedule, Reminder, ReminderStatus};
use crate::schedule;

/// Title shown on a materialized reminder.
fn reminder_title(med: &Medication) -> String {
    format!("Take {}", med.name)
}

/// Dose line shown under the title, with the medication notes when present.
fn reminder_description(med: &Medication) -> String {
    match &med.notes {
        Some(notes) => format!("{} {} ({})", med.dose, med.unit, notes),
        None => format!("{} {}", med.dose, med.unit),
    }
}

/// Materialize one schedule over `[window_start, window_end]` (inclusive
/// dates). Returns the number of reminders created.
///
/// All-or-nothing: if any row fails, no reminder of this invocation is
/// observable afterwards.
pub fn materialize_schedule(
    conn: &Connection,
    medication_id: &Uuid,
    schedule_rule: &MedicationSchedule,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Result<usize, DatabaseError> {
    let med = repository::get_medication(conn, medication_id)?
        .ok_or_else(|| DatabaseError::not_found("medication", medication_id))?;

    schedule::validate_schedule(schedule_rule)?;
    let occurrences = schedule::expand(schedule_rule, window_start, window_end);

    let window_from = window_start
        .and_hms_opt(0, 0, 0)
        .map(|at| at.and_utc())
        .unwrap_or_default();
    let window_to = window_end
        .and_hms_opt(23, 59, 59)
        .map(|at| at.and_utc())
        .unwrap_or_default();

    let tx = conn.unchecked_transaction()?;
    let replaced = repository::delete_pending_medication_reminders_in_range(
        &tx,
        medication_id,
        &window_from,
        &window_to,
    )?;

    for at in &occurrences {
        let reminder = Reminder {
            id: Uuid::new_v4(),
            senior_id: med.senior_id,
            title: reminder_title(&med),
            description: Some(reminder_description(&med)),
            scheduled_at: *at,
            status: ReminderStatus::Pending,
            done_at: None,
            medication_id: Some(*medication_id),
            actor_user_id: None,
        };
        repository::insert_reminder(&tx, &reminder)?;
    }
    tx.commit()?;

    tracing::debug!(
        medication = %med.name,
        created = occurrences.len(),
        replaced,
        "materialized schedule window {window_start}..{window_end}"
    );
    Ok(occurrences.len())
}

/// Materialize over the default window: 7 calendar days starting today.
pub fn materialize_default_window(
    conn: &Connection,
    clock: &dyn Clock,
    medication_id: &Uuid,
    schedule_rule: &MedicationSchedule,
) -> Result<usize, DatabaseError> {
    let (from, to) = schedule::default_window(clock.now().date_naive());
    materialize_schedule(conn, medication_id, schedule_rule, from, to)
}
