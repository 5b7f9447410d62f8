use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::IntakeStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub senior_id: Uuid,
    pub name: String,
    pub dose: String,
    pub unit: String,
    pub notes: Option<String>,
}

/// Recurrence rule for a medication: which hours of which days, bounded
/// by an optional date range. Owned by the medication and removed with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationSchedule {
    pub id: Uuid,
    pub medication_id: Uuid,
    /// Inclusive. Absent means the treatment is already running.
    pub start_date: Option<NaiveDate>,
    /// Inclusive. Absent means open-ended.
    pub end_date: Option<NaiveDate>,
    /// Hours of day (0-23), deduplicated and sorted ascending.
    pub hours: Vec<u32>,
    /// Days of week (0 = Monday .. 6 = Sunday). None or empty means every day.
    pub days_of_week: Option<Vec<u32>>,
}

/// One resolved medication occurrence. Immutable once written; corrections
/// go through the dedicated status mutation, never in-place edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeLog {
    pub id: Uuid,
    pub senior_id: Uuid,
    pub medication_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub taken_at: Option<DateTime<Utc>>,
    pub status: IntakeStatus,
    pub actor_user_id: Option<Uuid>,
}
