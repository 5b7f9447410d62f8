use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{fmt_instant, parse_enum, parse_instant, parse_opt_instant, parse_opt_uuid, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{IntakeLog, IntakeStatus};

const INTAKE_COLUMNS: &str =
    "id, senior_id, medication_id, scheduled_at, taken_at, status, actor_user_id";

fn intake_from_row(row: &Row) -> rusqlite::Result<IntakeLog> {
    Ok(IntakeLog {
        id: parse_uuid(0, row.get(0)?)?,
        senior_id: parse_uuid(1, row.get(1)?)?,
        medication_id: parse_uuid(2, row.get(2)?)?,
        scheduled_at: parse_instant(3, row.get(3)?)?,
        taken_at: parse_opt_instant(4, row.get(4)?)?,
        status: parse_enum(5, row.get(5)?)?,
        actor_user_id: parse_opt_uuid(6, row.get(6)?)?,
    })
}

/// True when the occurrence already has a log.
pub fn intake_exists(
    conn: &Connection,
    medication_id: &Uuid,
    scheduled_at: &DateTime<Utc>,
) -> Result<bool, DatabaseError> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM intake_logs WHERE medication_id = ?1 AND scheduled_at = ?2",
        params![medication_id.to_string(), fmt_instant(scheduled_at)],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Write one intake log. Each occurrence resolves at most once; a second
/// write for the same `(medication, scheduled_at)` pair is rejected.
pub fn insert_intake_log(conn: &Connection, log: &IntakeLog) -> Result<(), DatabaseError> {
    if intake_exists(conn, &log.medication_id, &log.scheduled_at)? {
        return Err(DatabaseError::ConstraintViolation(format!(
            "occurrence of medication {} at {} is already logged",
            log.medication_id,
            fmt_instant(&log.scheduled_at)
        )));
    }

    conn.execute(
        "INSERT INTO intake_logs (id, senior_id, medication_id, scheduled_at, taken_at, status, actor_user_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.id.to_string(),
            log.senior_id.to_string(),
            log.medication_id.to_string(),
            fmt_instant(&log.scheduled_at),
            log.taken_at.as_ref().map(fmt_instant),
            log.status.as_str(),
            log.actor_user_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

pub fn get_intake_log(conn: &Connection, id: &Uuid) -> Result<Option<IntakeLog>, DatabaseError> {
    let sql = format!("SELECT {INTAKE_COLUMNS} FROM intake_logs WHERE id = ?1");
    let result = conn.query_row(&sql, params![id.to_string()], intake_from_row);
    match result {
        Ok(log) => Ok(Some(log)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Intake history for a senior ordered by scheduled time, optionally
/// bounded (inclusive on both ends, matching period semantics).
pub fn list_intake_logs(
    conn: &Connection,
    senior_id: &Uuid,
    from: Option<&DateTime<Utc>>,
    to: Option<&DateTime<Utc>>,
) -> Result<Vec<IntakeLog>, DatabaseError> {
    let mut sql = format!("SELECT {INTAKE_COLUMNS} FROM intake_logs WHERE senior_id = ?1");
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(senior_id.to_string())];

    if let Some(from) = from {
        params_vec.push(Box::new(fmt_instant(from)));
        sql.push_str(&format!(" AND scheduled_at >= ?{}", params_vec.len()));
    }
    if let Some(to) = to {
        params_vec.push(Box::new(fmt_instant(to)));
        sql.push_str(&format!(" AND scheduled_at <= ?{}", params_vec.len()));
    }
    sql.push_str(" ORDER BY scheduled_at ASC");

    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_refs.as_slice(), intake_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// The dedicated correction mutation: replace the status of an existing
/// log. Moving to TAKEN with no recorded time stamps `taken_at` with the
/// given instant.
pub fn update_intake_status(
    conn: &Connection,
    id: &Uuid,
    status: IntakeStatus,
    now: &DateTime<Utc>,
) -> Result<IntakeLog, DatabaseError> {
    let existing = get_intake_log(conn, id)?.ok_or_else(|| DatabaseError::not_found("intake", id))?;

    let taken_at = match (status, existing.taken_at) {
        (IntakeStatus::Taken, None) => Some(*now),
        (_, current) => current,
    };

    conn.execute(
        "UPDATE intake_logs SET status = ?1, taken_at = ?2 WHERE id = ?3",
        params![
            status.as_str(),
            taken_at.as_ref().map(fmt_instant),
            id.to_string(),
        ],
    )?;

    Ok(IntakeLog {
        status,
        taken_at,
        ..existing
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::db::repository::{insert_medication, insert_senior};
    use crate::db::sqlite::open_memory_database;
    use crate::models::{Medication, SeniorProfile};

    fn seed(conn: &Connection) -> (Uuid, Uuid) {
        let senior = SeniorProfile {
            id: Uuid::new_v4(),
            full_name: "Carmen Diaz".into(),
            birthdate: None,
            conditions: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
        };
        insert_senior(conn, &senior).unwrap();
        let med = Medication {
            id: Uuid::new_v4(),
            senior_id: senior.id,
            name: "Metformin".into(),
            dose: "500".into(),
            unit: "mg".into(),
            notes: None,
        };
        insert_medication(conn, &med).unwrap();
        (senior.id, med.id)
    }

    fn log_at(senior_id: Uuid, medication_id: Uuid, at: DateTime<Utc>) -> IntakeLog {
        IntakeLog {
            id: Uuid::new_v4(),
            senior_id,
            medication_id,
            scheduled_at: at,
            taken_at: Some(at),
            status: IntakeStatus::Taken,
            actor_user_id: None,
        }
    }

    #[test]
    fn one_log_per_occurrence() {
        let conn = open_memory_database().unwrap();
        let (senior_id, medication_id) = seed(&conn);
        let at = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();

        insert_intake_log(&conn, &log_at(senior_id, medication_id, at)).unwrap();
        let err = insert_intake_log(&conn, &log_at(senior_id, medication_id, at)).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn list_respects_inclusive_bounds() {
        let conn = open_memory_database().unwrap();
        let (senior_id, medication_id) = seed(&conn);

        let first = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2025, 3, 11, 8, 0, 0).unwrap();
        let third = Utc.with_ymd_and_hms(2025, 3, 12, 8, 0, 0).unwrap();
        for at in [first, second, third] {
            insert_intake_log(&conn, &log_at(senior_id, medication_id, at)).unwrap();
        }

        let rows = list_intake_logs(&conn, &senior_id, Some(&first), Some(&second)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].scheduled_at, first);
        assert_eq!(rows[1].scheduled_at, second);

        let all = list_intake_logs(&conn, &senior_id, None, None).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn status_correction_fills_taken_at() {
        let conn = open_memory_database().unwrap();
        let (senior_id, medication_id) = seed(&conn);
        let at = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();

        let mut log = log_at(senior_id, medication_id, at);
        log.status = IntakeStatus::Missed;
        log.taken_at = None;
        insert_intake_log(&conn, &log).unwrap();

        let now = Utc.with_ymd_and_hms(2025, 3, 10, 21, 0, 0).unwrap();
        let updated = update_intake_status(&conn, &log.id, IntakeStatus::Taken, &now).unwrap();
        assert_eq!(updated.status, IntakeStatus::Taken);
        assert_eq!(updated.taken_at, Some(now));

        let reloaded = get_intake_log(&conn, &log.id).unwrap().unwrap();
        assert_eq!(reloaded.status, IntakeStatus::Taken);
        assert_eq!(reloaded.taken_at, Some(now));
    }

    #[test]
    fn correction_of_unknown_log_is_not_found() {
        let conn = open_memory_database().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let err =
            update_intake_status(&conn, &Uuid::new_v4(), IntakeStatus::Skipped, &now).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
