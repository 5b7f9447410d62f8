//! Repository layer — entity-scoped database operations.
//!
//! Plain functions over a borrowed `Connection`, grouped per entity.
//! Ids are stored as uuid TEXT, instants as RFC 3339 UTC TEXT (second
//! precision, `Z` suffix) so range comparisons work lexicographically,
//! dates as `YYYY-MM-DD` TEXT.

mod appointment;
mod audit;
mod intake;
mod medication;
mod reminder;
mod schedule;
mod senior;

pub use appointment::*;
pub use audit::*;
pub use intake::*;
pub use medication::*;
pub use reminder::*;
pub use schedule::*;
pub use senior::*;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use uuid::Uuid;

pub(crate) fn fmt_instant(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn parse_instant(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                Type::Text,
                format!("bad instant {raw:?}: {e}").into(),
            )
        })
}

pub(crate) fn parse_opt_instant(
    idx: usize,
    raw: Option<String>,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    raw.map(|s| parse_instant(idx, s)).transpose()
}

pub(crate) fn parse_date(idx: usize, raw: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("bad date {raw:?}: {e}").into(),
        )
    })
}

pub(crate) fn parse_opt_date(
    idx: usize,
    raw: Option<String>,
) -> rusqlite::Result<Option<NaiveDate>> {
    raw.map(|s| parse_date(idx, s)).transpose()
}

pub(crate) fn parse_uuid(idx: usize, raw: String) -> rusqlite::Result<Uuid> {
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("bad uuid {raw:?}: {e}").into(),
        )
    })
}

pub(crate) fn parse_opt_uuid(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<Uuid>> {
    raw.map(|s| parse_uuid(idx, s)).transpose()
}

pub(crate) fn parse_enum<T>(idx: usize, raw: String) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, format!("{e}").into())
    })
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    idx: usize,
    raw: String,
) -> rusqlite::Result<T> {
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("bad json column: {e}").into(),
        )
    })
}
