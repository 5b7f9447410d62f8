use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{fmt_instant, parse_enum, parse_instant, parse_opt_instant, parse_opt_uuid, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Reminder, ReminderStatus};

const REMINDER_COLUMNS: &str = "id, senior_id, title, description, scheduled_at, status,
         done_at, medication_id, actor_user_id";

fn reminder_from_row(row: &Row) -> rusqlite::Result<Reminder> {
    Ok(Reminder {
        id: parse_uuid(0, row.get(0)?)?,
        senior_id: parse_uuid(1, row.get(1)?)?,
        title: row.get(2)?,
        description: row.get(3)?,
        scheduled_at: parse_instant(4, row.get(4)?)?,
        status: parse_enum(5, row.get(5)?)?,
        done_at: parse_opt_instant(6, row.get(6)?)?,
        medication_id: parse_opt_uuid(7, row.get(7)?)?,
        actor_user_id: parse_opt_uuid(8, row.get(8)?)?,
    })
}

pub fn insert_reminder(conn: &Connection, reminder: &Reminder) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO reminders (id, senior_id, title, description, scheduled_at, status,
         done_at, medication_id, actor_user_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            reminder.id.to_string(),
            reminder.senior_id.to_string(),
            reminder.title,
            reminder.description,
            fmt_instant(&reminder.scheduled_at),
            reminder.status.as_str(),
            reminder.done_at.as_ref().map(fmt_instant),
            reminder.medication_id.map(|id| id.to_string()),
            reminder.actor_user_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

/// Persist a batch of reminders atomically: either every row lands or
/// none do. Used by schedule materialization.
pub fn insert_reminders(conn: &Connection, reminders: &[Reminder]) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    for reminder in reminders {
        insert_reminder(&tx, reminder)?;
    }
    tx.commit()?;
    Ok(())
}

pub fn get_reminder(conn: &Connection, id: &Uuid) -> Result<Option<Reminder>, DatabaseError> {
    let sql = format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?1");
    let result = conn.query_row(&sql, params![id.to_string()], reminder_from_row);
    match result {
        Ok(reminder) => Ok(Some(reminder)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Reminders for a senior with `scheduled_at` in `[from, to)`, ascending.
pub fn list_reminders_in_range(
    conn: &Connection,
    senior_id: &Uuid,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<Vec<Reminder>, DatabaseError> {
    let sql = format!(
        "SELECT {REMINDER_COLUMNS} FROM reminders
         WHERE senior_id = ?1 AND scheduled_at >= ?2 AND scheduled_at < ?3
         ORDER BY scheduled_at ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            params![senior_id.to_string(), fmt_instant(from), fmt_instant(to)],
            reminder_from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Pending medication-linked reminders whose scheduled time lies strictly
/// before `cutoff`. Input for the missed-intake sweep.
pub fn list_pending_medication_reminders_before(
    conn: &Connection,
    senior_id: &Uuid,
    cutoff: &DateTime<Utc>,
) -> Result<Vec<Reminder>, DatabaseError> {
    let sql = format!(
        "SELECT {REMINDER_COLUMNS} FROM reminders
         WHERE senior_id = ?1 AND status = 'PENDING'
           AND medication_id IS NOT NULL AND scheduled_at < ?2
         ORDER BY scheduled_at ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            params![senior_id.to_string(), fmt_instant(cutoff)],
            reminder_from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Drop PENDING reminders of one medication inside `[from, to]`. DONE and
/// CANCELLED rows are history and stay untouched. Returns rows removed.
pub fn delete_pending_medication_reminders_in_range(
    conn: &Connection,
    medication_id: &Uuid,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<usize, DatabaseError> {
    let removed = conn.execute(
        "DELETE FROM reminders
         WHERE medication_id = ?1 AND status = 'PENDING'
           AND scheduled_at >= ?2 AND scheduled_at <= ?3",
        params![medication_id.to_string(), fmt_instant(from), fmt_instant(to)],
    )?;
    Ok(removed)
}

pub fn set_reminder_done(
    conn: &Connection,
    id: &Uuid,
    done_at: &DateTime<Utc>,
    actor_user_id: Option<&Uuid>,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE reminders SET status = ?1, done_at = ?2, actor_user_id = ?3 WHERE id = ?4",
        params![
            ReminderStatus::Done.as_str(),
            fmt_instant(done_at),
            actor_user_id.map(|id| id.to_string()),
            id.to_string(),
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::not_found("reminder", id));
    }
    Ok(())
}

pub fn set_reminder_cancelled(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE reminders SET status = ?1 WHERE id = ?2",
        params![ReminderStatus::Cancelled.as_str(), id.to_string()],
    )?;
    if updated == 0 {
        return Err(DatabaseError::not_found("reminder", id));
    }
    Ok(())
}
