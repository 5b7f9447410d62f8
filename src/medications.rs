//! Medication service — create medications and schedules, record intakes.
//!
//! The write paths here are what the care apps call when a caregiver or
//! the senior manages a treatment: create a medication (optionally with
//! its schedule in one step), attach a schedule later, log a dose, or
//! correct a logged dose. Each schedule write re-materializes the
//! reminder window.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;
use crate::db::{repository, DatabaseError};
use crate::intake::{self, IntakeResolution};
use crate::materialize;
use crate::models::{IntakeLog, IntakeStatus, Medication, MedicationSchedule};
use crate::schedule;

/// Input for creating a medication. Schedule fields are optional; when
/// hours are present the schedule is stored and reminders materialized
/// in the same call.
#[derive(Debug, Clone, Deserialize)]
pub struct MedicationInput {
    pub name: String,
    pub dose: String,
    pub unit: String,
    pub notes: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub hours: Option<Vec<u32>>,
    pub days_of_week: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleInput {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub hours: Vec<u32>,
    pub days_of_week: Option<Vec<u32>>,
}

/// A medication with its recurrence rules attached, for list views.
#[derive(Debug, Clone, Serialize)]
pub struct MedicationWithSchedules {
    pub medication: Medication,
    pub schedules: Vec<MedicationSchedule>,
}

/// Create a medication for a senior. When the input carries hours the
/// schedule is validated first (nothing is written on a malformed rule),
/// then medication, schedule and the reminder window are all persisted.
pub fn create_medication(
    conn: &Connection,
    clock: &dyn Clock,
    senior_id: &Uuid,
    input: &MedicationInput,
    actor_user_id: Option<&Uuid>,
) -> Result<Medication, DatabaseError> {
    if repository::get_senior(conn, senior_id)?.is_none() {
        return Err(DatabaseError::not_found("senior", senior_id));
    }

    // Validate the inline schedule before any row lands.
    let normalized = match &input.hours {
        Some(hours) if !hours.is_empty() => {
            schedule::validate_date_range(input.start_date, input.end_date)?;
            let hours = schedule::normalize_hours(hours)?;
            let days = schedule::normalize_days(input.days_of_week.as_deref())?;
            Some((hours, days))
        }
        _ => None,
    };

    let med = Medication {
        id: Uuid::new_v4(),
        senior_id: *senior_id,
        name: input.name.clone(),
        dose: input.dose.clone(),
        unit: input.unit.clone(),
        notes: input.notes.clone(),
    };
    repository::insert_medication(conn, &med)?;

    if let Some((hours, days_of_week)) = normalized {
        let rule = MedicationSchedule {
            id: Uuid::new_v4(),
            medication_id: med.id,
            start_date: input.start_date,
            end_date: input.end_date,
            hours,
            days_of_week,
        };
        repository::insert_schedule(conn, &rule)?;
        materialize::materialize_default_window(conn, clock, &med.id, &rule)?;
    }

    repository::record_action(
        conn,
        &clock.now(),
        actor_user_id,
        "CREATE",
        "Medication",
        &med.id.to_string(),
        None,
    )?;
    tracing::info!(senior = %senior_id, medication = %med.name, "medication created");
    Ok(med)
}

/// Attach a schedule to an existing medication and materialize its
/// reminder window.
pub fn add_schedule(
    conn: &Connection,
    clock: &dyn Clock,
    medication_id: &Uuid,
    input: &ScheduleInput,
    actor_user_id: Option<&Uuid>,
) -> Result<MedicationSchedule, DatabaseError> {
    if repository::get_medication(conn, medication_id)?.is_none() {
        return Err(DatabaseError::not_found("medication", medication_id));
    }

    schedule::validate_date_range(input.start_date, input.end_date)?;
    let rule = MedicationSchedule {
        id: Uuid::new_v4(),
        medication_id: *medication_id,
        start_date: input.start_date,
        end_date: input.end_date,
        hours: schedule::normalize_hours(&input.hours)?,
        days_of_week: schedule::normalize_days(input.days_of_week.as_deref())?,
    };
    repository::insert_schedule(conn, &rule)?;
    materialize::materialize_default_window(conn, clock, medication_id, &rule)?;

    repository::record_action(
        conn,
        &clock.now(),
        actor_user_id,
        "CREATE",
        "MedicationSchedule",
        &rule.id.to_string(),
        None,
    )?;
    Ok(rule)
}

/// All medications of a senior with their schedules, ordered by name.
pub fn list_medications(
    conn: &Connection,
    senior_id: &Uuid,
) -> Result<Vec<MedicationWithSchedules>, DatabaseError> {
    let meds = repository::list_medications_for_senior(conn, senior_id)?;
    let mut out = Vec::with_capacity(meds.len());
    for medication in meds {
        let schedules = repository::list_schedules_for_medication(conn, &medication.id)?;
        out.push(MedicationWithSchedules {
            medication,
            schedules,
        });
    }
    Ok(out)
}

/// One medication with its schedules attached.
pub fn get_medication(
    conn: &Connection,
    medication_id: &Uuid,
) -> Result<MedicationWithSchedules, DatabaseError> {
    let medication = repository::get_medication(conn, medication_id)?
        .ok_or_else(|| DatabaseError::not_found("medication", medication_id))?;
    let schedules = repository::list_schedules_for_medication(conn, medication_id)?;
    Ok(MedicationWithSchedules {
        medication,
        schedules,
    })
}

/// Remove a medication together with its schedules, pending reminders and
/// intake history.
pub fn delete_medication(
    conn: &Connection,
    clock: &dyn Clock,
    medication_id: &Uuid,
    actor_user_id: Option<&Uuid>,
) -> Result<(), DatabaseError> {
    let med = repository::get_medication(conn, medication_id)?
        .ok_or_else(|| DatabaseError::not_found("medication", medication_id))?;

    repository::delete_medication_cascade(conn, medication_id)?;
    repository::record_action(
        conn,
        &clock.now(),
        actor_user_id,
        "DELETE",
        "Medication",
        &medication_id.to_string(),
        None,
    )?;
    tracing::info!(senior = %med.senior_id, medication = %med.name, "medication deleted");
    Ok(())
}

/// Resolve one scheduled occurrence. The status is assigned by the
/// classifier, never taken from the caller.
pub fn log_intake(
    conn: &Connection,
    clock: &dyn Clock,
    medication_id: &Uuid,
    scheduled_at: &DateTime<Utc>,
    resolution: IntakeResolution,
    actor_user_id: Option<&Uuid>,
) -> Result<IntakeLog, DatabaseError> {
    let med = repository::get_medication(conn, medication_id)?
        .ok_or_else(|| DatabaseError::not_found("medication", medication_id))?;

    let now = clock.now();
    let status = intake::classify(*scheduled_at, resolution, now)?;
    let taken_at = match resolution {
        IntakeResolution::Taken(at) => Some(at),
        _ => None,
    };

    let log = IntakeLog {
        id: Uuid::new_v4(),
        senior_id: med.senior_id,
        medication_id: *medication_id,
        scheduled_at: *scheduled_at,
        taken_at,
        status,
        actor_user_id: actor_user_id.copied(),
    };
    repository::insert_intake_log(conn, &log)?;
    repository::record_action(
        conn,
        &now,
        actor_user_id,
        "CREATE",
        "IntakeLog",
        &log.id.to_string(),
        None,
    )?;
    Ok(log)
}

/// Quick "taken right now" entry, outside any schedule: the occurrence
/// and the intake share the current instant.
pub fn mark_medication_taken(
    conn: &Connection,
    clock: &dyn Clock,
    medication_id: &Uuid,
    actor_user_id: Option<&Uuid>,
) -> Result<IntakeLog, DatabaseError> {
    let now = clock.now();
    log_intake(
        conn,
        clock,
        medication_id,
        &now,
        IntakeResolution::Taken(now),
        actor_user_id,
    )
}

/// Intake history for a senior, optionally bounded, ascending.
pub fn list_intakes(
    conn: &Connection,
    senior_id: &Uuid,
    from: Option<&DateTime<Utc>>,
    to: Option<&DateTime<Utc>>,
) -> Result<Vec<IntakeLog>, DatabaseError> {
    repository::list_intake_logs(conn, senior_id, from, to)
}

/// Correct a logged occurrence's status.
pub fn update_intake_status(
    conn: &Connection,
    clock: &dyn Clock,
    intake_id: &Uuid,
    status: IntakeStatus,
    actor_user_id: Option<&Uuid>,
) -> Result<IntakeLog, DatabaseError> {
    let now = clock.now();
    let updated = repository::update_intake_status(conn, intake_id, status, &now)?;
    repository::record_action(
        conn,
        &now,
        actor_user_id,
        "UPDATE",
        "IntakeLog",
        &intake_id.to_string(),
        None,
    )?;
    Ok(updated)
}
