use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{parse_enum, parse_opt_date, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{CareTeamMember, SeniorProfile, User};

pub fn insert_senior(conn: &Connection, senior: &SeniorProfile) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO seniors (id, full_name, birthdate, conditions,
         emergency_contact_name, emergency_contact_phone)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            senior.id.to_string(),
            senior.full_name,
            senior.birthdate.map(|d| d.to_string()),
            senior.conditions,
            senior.emergency_contact_name,
            senior.emergency_contact_phone,
        ],
    )?;
    Ok(())
}

pub fn get_senior(conn: &Connection, id: &Uuid) -> Result<Option<SeniorProfile>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, full_name, birthdate, conditions,
                emergency_contact_name, emergency_contact_phone
         FROM seniors WHERE id = ?1",
        params![id.to_string()],
        |row| {
            Ok(SeniorProfile {
                id: parse_uuid(0, row.get(0)?)?,
                full_name: row.get(1)?,
                birthdate: parse_opt_date(2, row.get(2)?)?,
                conditions: row.get(3)?,
                emergency_contact_name: row.get(4)?,
                emergency_contact_phone: row.get(5)?,
            })
        },
    );
    match result {
        Ok(senior) => Ok(Some(senior)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, full_name, role) VALUES (?1, ?2, ?3)",
        params![user.id.to_string(), user.full_name, user.role.as_str()],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<Option<User>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, full_name, role FROM users WHERE id = ?1",
        params![id.to_string()],
        |row| {
            Ok(User {
                id: parse_uuid(0, row.get(0)?)?,
                full_name: row.get(1)?,
                role: parse_enum(2, row.get(2)?)?,
            })
        },
    );
    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Add a user to a senior's care team. Duplicate memberships are rejected.
pub fn add_team_member(conn: &Connection, member: &CareTeamMember) -> Result<(), DatabaseError> {
    if get_senior(conn, &member.senior_id)?.is_none() {
        return Err(DatabaseError::not_found("senior", member.senior_id));
    }
    if get_user(conn, &member.user_id)?.is_none() {
        return Err(DatabaseError::not_found("user", member.user_id));
    }

    let exists: u32 = conn.query_row(
        "SELECT COUNT(*) FROM care_team WHERE senior_id = ?1 AND user_id = ?2",
        params![member.senior_id.to_string(), member.user_id.to_string()],
        |row| row.get(0),
    )?;
    if exists > 0 {
        return Err(DatabaseError::ConstraintViolation(format!(
            "user {} is already on the care team of senior {}",
            member.user_id, member.senior_id
        )));
    }

    conn.execute(
        "INSERT INTO care_team (id, senior_id, user_id, membership_role, can_view, can_edit)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            member.id.to_string(),
            member.senior_id.to_string(),
            member.user_id.to_string(),
            member.membership_role.as_str(),
            member.can_view as i32,
            member.can_edit as i32,
        ],
    )?;
    Ok(())
}

pub fn list_team(conn: &Connection, senior_id: &Uuid) -> Result<Vec<CareTeamMember>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, senior_id, user_id, membership_role, can_view, can_edit
         FROM care_team WHERE senior_id = ?1",
    )?;
    let rows = stmt
        .query_map(params![senior_id.to_string()], |row| {
            Ok(CareTeamMember {
                id: parse_uuid(0, row.get(0)?)?,
                senior_id: parse_uuid(1, row.get(1)?)?,
                user_id: parse_uuid(2, row.get(2)?)?,
                membership_role: parse_enum(3, row.get(3)?)?,
                can_view: row.get::<_, i32>(4)? != 0,
                can_edit: row.get::<_, i32>(5)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
