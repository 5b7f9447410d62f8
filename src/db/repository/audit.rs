use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{fmt_instant, parse_instant};
use crate::db::DatabaseError;
use crate::models::AuditLog;

/// Append one action to the audit trail. Never updated afterwards.
pub fn record_action(
    conn: &Connection,
    now: &DateTime<Utc>,
    actor_user_id: Option<&Uuid>,
    action: &str,
    entity: &str,
    entity_id: &str,
    meta: Option<&serde_json::Value>,
) -> Result<AuditLog, DatabaseError> {
    let log = AuditLog {
        id: Uuid::new_v4(),
        actor_user_id: actor_user_id.copied(),
        action: action.into(),
        entity: entity.into(),
        entity_id: entity_id.into(),
        meta: meta.cloned(),
        created_at: *now,
    };
    conn.execute(
        "INSERT INTO audit_logs (id, actor_user_id, action, entity, entity_id, meta, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.id.to_string(),
            log.actor_user_id.map(|id| id.to_string()),
            log.action,
            log.entity,
            log.entity_id,
            log.meta.as_ref().map(|m| m.to_string()),
            fmt_instant(&log.created_at),
        ],
    )?;
    Ok(log)
}

/// Number of recorded actions for one user inside `[from, to]`.
pub fn count_actions_in_period(
    conn: &Connection,
    user_id: &Uuid,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<u32, DatabaseError> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM audit_logs
         WHERE actor_user_id = ?1 AND created_at >= ?2 AND created_at <= ?3",
        params![user_id.to_string(), fmt_instant(from), fmt_instant(to)],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Most recent action instant for one user inside `[from, to]`, if any.
pub fn last_action_in_period(
    conn: &Connection,
    user_id: &Uuid,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    let result = conn.query_row(
        "SELECT created_at FROM audit_logs
         WHERE actor_user_id = ?1 AND created_at >= ?2 AND created_at <= ?3
         ORDER BY created_at DESC LIMIT 1",
        params![user_id.to_string(), fmt_instant(from), fmt_instant(to)],
        |row| parse_instant(0, row.get(0)?),
    );
    match result {
        Ok(at) => Ok(Some(at)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}
