use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{parse_json, parse_opt_date, parse_uuid};
use crate::db::DatabaseError;
use crate::models::MedicationSchedule;

fn schedule_from_row(row: &Row) -> rusqlite::Result<MedicationSchedule> {
    let days_raw: Option<String> = row.get(5)?;
    Ok(MedicationSchedule {
        id: parse_uuid(0, row.get(0)?)?,
        medication_id: parse_uuid(1, row.get(1)?)?,
        start_date: parse_opt_date(2, row.get(2)?)?,
        end_date: parse_opt_date(3, row.get(3)?)?,
        hours: parse_json(4, row.get(4)?)?,
        days_of_week: days_raw.map(|s| parse_json(5, s)).transpose()?,
    })
}

pub fn insert_schedule(
    conn: &Connection,
    schedule: &MedicationSchedule,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medication_schedules (id, medication_id, start_date, end_date, hours, days_of_week)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            schedule.id.to_string(),
            schedule.medication_id.to_string(),
            schedule.start_date.map(|d| d.to_string()),
            schedule.end_date.map(|d| d.to_string()),
            serde_json::to_string(&schedule.hours).unwrap_or_default(),
            schedule
                .days_of_week
                .as_ref()
                .map(|d| serde_json::to_string(d).unwrap_or_default()),
        ],
    )?;
    Ok(())
}

pub fn list_schedules_for_medication(
    conn: &Connection,
    medication_id: &Uuid,
) -> Result<Vec<MedicationSchedule>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, medication_id, start_date, end_date, hours, days_of_week
         FROM medication_schedules WHERE medication_id = ?1 ORDER BY created_at ASC",
    )?;
    let rows = stmt
        .query_map(params![medication_id.to_string()], schedule_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
