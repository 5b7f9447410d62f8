//! Intake classification.
//!
//! A scheduled occurrence resolves exactly once, at the moment it is
//! recorded: taken (possibly late), skipped by the user, or missed after
//! the occurrence elapsed with no action. The classification itself is a
//! pure function; writing the resulting log lives in the repository.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::models::IntakeStatus;

/// Grace period after the scheduled time during which an intake still
/// counts as on time.
pub const LATE_THRESHOLD_MINUTES: i64 = 60;

pub fn late_threshold() -> Duration {
    Duration::minutes(LATE_THRESHOLD_MINUTES)
}

/// How a pending occurrence was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeResolution {
    /// The medication was taken at the given instant.
    Taken(DateTime<Utc>),
    /// The user explicitly declined this dose.
    Skipped,
    /// The occurrence window elapsed without any action (end-of-day sweep).
    Elapsed,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntakeError {
    #[error("occurrence scheduled at {0} has not elapsed yet")]
    NotYetElapsed(DateTime<Utc>),
}

/// Assign the intake status for one occurrence.
///
/// Marking an occurrence as missed requires that its scheduled time has
/// actually passed; calling earlier is a precondition violation, not a
/// status.
pub fn classify(
    scheduled_at: DateTime<Utc>,
    resolution: IntakeResolution,
    now: DateTime<Utc>,
) -> Result<IntakeStatus, IntakeError> {
    match resolution {
        IntakeResolution::Taken(taken_at) => {
            if taken_at <= scheduled_at + late_threshold() {
                Ok(IntakeStatus::Taken)
            } else {
                Ok(IntakeStatus::Late)
            }
        }
        IntakeResolution::Skipped => Ok(IntakeStatus::Skipped),
        IntakeResolution::Elapsed => {
            if now > scheduled_at {
                Ok(IntakeStatus::Missed)
            } else {
                Err(IntakeError::NotYetElapsed(scheduled_at))
            }
        }
    }
}
