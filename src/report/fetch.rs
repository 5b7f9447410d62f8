//! Read-only queries feeding the report path.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::repository::{
    count_actions_in_period, fmt_instant, last_action_in_period, parse_enum, parse_uuid,
};
use crate::db::DatabaseError;
use crate::models::{AppointmentStatus, ReminderStatus};

use super::types::{AppointmentSummary, CareTeamActivity, ReminderStats};

/// Appointment counts by status for appointments starting in `[from, to]`.
pub fn fetch_appointments_summary(
    conn: &Connection,
    senior_id: &Uuid,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<AppointmentSummary, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT status, COUNT(*) FROM appointments
         WHERE senior_id = ?1 AND starts_at >= ?2 AND starts_at <= ?3
         GROUP BY status",
    )?;
    let rows = stmt
        .query_map(
            params![senior_id.to_string(), fmt_instant(from), fmt_instant(to)],
            |row| {
                let status: AppointmentStatus = parse_enum(0, row.get(0)?)?;
                let count: u32 = row.get(1)?;
                Ok((status, count))
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = AppointmentSummary::default();
    for (status, count) in rows {
        summary.total += count;
        match status {
            AppointmentStatus::Completed => summary.completed += count,
            AppointmentStatus::Cancelled => summary.cancelled += count,
            AppointmentStatus::Scheduled => summary.pending += count,
            AppointmentStatus::Missed => summary.missed += count,
        }
    }
    Ok(summary)
}

/// Total and completed reminder counts scheduled in `[from, to]`.
pub fn fetch_reminder_stats(
    conn: &Connection,
    senior_id: &Uuid,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<ReminderStats, DatabaseError> {
    let total: u32 = conn.query_row(
        "SELECT COUNT(*) FROM reminders
         WHERE senior_id = ?1 AND scheduled_at >= ?2 AND scheduled_at <= ?3",
        params![senior_id.to_string(), fmt_instant(from), fmt_instant(to)],
        |row| row.get(0),
    )?;
    let completed: u32 = conn.query_row(
        "SELECT COUNT(*) FROM reminders
         WHERE senior_id = ?1 AND scheduled_at >= ?2 AND scheduled_at <= ?3 AND status = ?4",
        params![
            senior_id.to_string(),
            fmt_instant(from),
            fmt_instant(to),
            ReminderStatus::Done.as_str(),
        ],
        |row| row.get(0),
    )?;
    Ok(ReminderStats { total, completed })
}

/// Audit activity per care team member inside `[from, to]`, sorted
/// most-active first.
pub fn fetch_care_team_activity(
    conn: &Connection,
    senior_id: &Uuid,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<Vec<CareTeamActivity>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT ct.user_id, u.full_name, ct.membership_role
         FROM care_team ct
         INNER JOIN users u ON ct.user_id = u.id
         WHERE ct.senior_id = ?1
         ORDER BY u.full_name ASC",
    )?;
    let members = stmt
        .query_map(params![senior_id.to_string()], |row| {
            Ok((
                parse_uuid(0, row.get(0)?)?,
                row.get::<_, String>(1)?,
                parse_enum(2, row.get(2)?)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut activities = Vec::with_capacity(members.len());
    for (user_id, user_name, role) in members {
        let actions_count = count_actions_in_period(conn, &user_id, from, to)?;
        let last_activity = last_action_in_period(conn, &user_id, from, to)?;
        activities.push(CareTeamActivity {
            user_id,
            user_name,
            role,
            actions_count,
            last_activity,
        });
    }
    activities.sort_by(|a, b| b.actions_count.cmp(&a.actions_count));
    Ok(activities)
}
