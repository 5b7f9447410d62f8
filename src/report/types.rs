use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::MembershipRole;

/// Adherence figures for one medication over a period. `late` doses are
/// shown but count toward neither `taken` nor `missed`; the rate is
/// taken over taken + missed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationAdherenceDetail {
    pub medication_id: Uuid,
    pub medication_name: String,
    pub total_doses: u32,
    pub taken: u32,
    pub missed: u32,
    pub late: u32,
    /// In [0.0, 1.0]; 0.0 when no doses fell in the period.
    pub adherence_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentSummary {
    pub total: u32,
    pub completed: u32,
    pub cancelled: u32,
    pub pending: u32,
    pub missed: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderStats {
    pub total: u32,
    pub completed: u32,
}

/// Event counts for one hour of the day across the period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityBucket {
    pub hour: u32,
    pub medication_intakes: u32,
    pub appointments: u32,
    pub reminders: u32,
}

impl ActivityBucket {
    pub fn combined(&self) -> u32 {
        self.medication_intakes + self.appointments + self.reminders
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareTeamActivity {
    pub user_id: Uuid,
    pub user_name: String,
    pub role: MembershipRole,
    pub actions_count: u32,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Flat intake counters for a senior over a period (stats endpoint
/// shape). Unlike the per-medication detail, the rate here is taken over
/// all four statuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeStats {
    pub total_intakes: u32,
    pub taken: u32,
    pub missed: u32,
    pub late: u32,
    pub skipped: u32,
    pub adherence_rate: f64,
}

/// The full health report for one senior and period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeniorHealthReport {
    pub senior_id: Uuid,
    pub senior_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_medications: u32,
    /// Unweighted mean of per-medication rates, in [0.0, 1.0].
    pub medication_adherence: f64,
    pub medications_detail: Vec<MedicationAdherenceDetail>,
    pub appointments_summary: AppointmentSummary,
    pub total_reminders: u32,
    pub completed_reminders: u32,
    pub activity_by_hour: Vec<ActivityBucket>,
    pub most_active_hours: Vec<u32>,
    pub care_team_activity: Vec<CareTeamActivity>,
    pub insights: Vec<String>,
}
