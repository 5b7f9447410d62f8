use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{fmt_instant, parse_enum, parse_instant, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentStatus};

fn appointment_from_row(row: &Row) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: parse_uuid(0, row.get(0)?)?,
        senior_id: parse_uuid(1, row.get(1)?)?,
        doctor_user_id: parse_uuid(2, row.get(2)?)?,
        starts_at: parse_instant(3, row.get(3)?)?,
        location: row.get(4)?,
        reason: row.get(5)?,
        status: parse_enum(6, row.get(6)?)?,
    })
}

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, senior_id, doctor_user_id, starts_at, location, reason, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            appt.id.to_string(),
            appt.senior_id.to_string(),
            appt.doctor_user_id.to_string(),
            fmt_instant(&appt.starts_at),
            appt.location,
            appt.reason,
            appt.status.as_str(),
        ],
    )?;
    Ok(())
}

/// Appointments starting inside `[from, to]`, ascending by start.
pub fn list_appointments_in_period(
    conn: &Connection,
    senior_id: &Uuid,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, senior_id, doctor_user_id, starts_at, location, reason, status
         FROM appointments
         WHERE senior_id = ?1 AND starts_at >= ?2 AND starts_at <= ?3
         ORDER BY starts_at ASC",
    )?;
    let rows = stmt
        .query_map(
            params![senior_id.to_string(), fmt_instant(from), fmt_instant(to)],
            appointment_from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn set_appointment_status(
    conn: &Connection,
    id: &Uuid,
    status: AppointmentStatus,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE appointments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id.to_string()],
    )?;
    if updated == 0 {
        return Err(DatabaseError::not_found("appointment", id));
    }
    Ok(())
}
