use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub senior_id: Uuid,
    pub doctor_user_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub location: Option<String>,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
}
