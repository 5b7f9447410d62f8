use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ReminderStatus;

/// One concrete scheduled action for a senior. Medication reminders carry
/// a back-reference to the medication they were materialized from; ad-hoc
/// reminders do not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub senior_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub status: ReminderStatus,
    pub done_at: Option<DateTime<Utc>>,
    pub medication_id: Option<Uuid>,
    pub actor_user_id: Option<Uuid>,
}
