use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only record of one mutation, keyed by the acting user.
/// Care-team activity reporting counts these per member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub actor_user_id: Option<Uuid>,
    /// e.g. CREATE, UPDATE, DELETE, DONE
    pub action: String,
    /// e.g. "Medication"
    pub entity: String,
    pub entity_id: String,
    pub meta: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
