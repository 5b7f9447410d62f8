use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::Medication;

fn medication_from_row(row: &Row) -> rusqlite::Result<Medication> {
    Ok(Medication {
        id: parse_uuid(0, row.get(0)?)?,
        senior_id: parse_uuid(1, row.get(1)?)?,
        name: row.get(2)?,
        dose: row.get(3)?,
        unit: row.get(4)?,
        notes: row.get(5)?,
    })
}

pub fn insert_medication(conn: &Connection, med: &Medication) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, senior_id, name, dose, unit, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            med.id.to_string(),
            med.senior_id.to_string(),
            med.name,
            med.dose,
            med.unit,
            med.notes,
        ],
    )?;
    Ok(())
}

pub fn get_medication(conn: &Connection, id: &Uuid) -> Result<Option<Medication>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, senior_id, name, dose, unit, notes FROM medications WHERE id = ?1",
        params![id.to_string()],
        medication_from_row,
    );
    match result {
        Ok(med) => Ok(Some(med)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// All medications for one senior, ordered by name.
pub fn list_medications_for_senior(
    conn: &Connection,
    senior_id: &Uuid,
) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, senior_id, name, dose, unit, notes
         FROM medications WHERE senior_id = ?1 ORDER BY name ASC",
    )?;
    let rows = stmt
        .query_map(params![senior_id.to_string()], medication_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Remove a medication with its dependents. Schedules go via the FK
/// cascade; intake history and not-yet-due reminders are deleted
/// explicitly. Completed and cancelled reminders stay as history, losing
/// their back-reference via SET NULL.
pub fn delete_medication_cascade(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM intake_logs WHERE medication_id = ?1",
        params![id.to_string()],
    )?;
    conn.execute(
        "DELETE FROM reminders WHERE medication_id = ?1 AND status = 'PENDING'",
        params![id.to_string()],
    )?;
    conn.execute(
        "DELETE FROM medications WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(())
}
