use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{MembershipRole, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeniorProfile {
    pub id: Uuid,
    pub full_name: String,
    pub birthdate: Option<NaiveDate>,
    pub conditions: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

/// Minimal projection of the account service's user record. Carried here
/// because care-team reporting surfaces member names and roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareTeamMember {
    pub id: Uuid,
    pub senior_id: Uuid,
    pub user_id: Uuid,
    pub membership_role: MembershipRole,
    pub can_view: bool,
    pub can_edit: bool,
}
