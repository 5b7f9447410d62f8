//! Rule-based narrative insights.
//!
//! A fixed, ordered rule set over the aggregated figures. Every rule
//! that matches contributes one line; only the three adherence bands are
//! mutually exclusive. Pure and deterministic: the same figures always
//! produce the same lines in the same order.

use super::types::{AppointmentSummary, CareTeamActivity, MedicationAdherenceDetail, ReminderStats};

/// Per-medication and overall adherence below this rate raise concern.
const ADHERENCE_LOW: f64 = 0.70;
/// Overall adherence at or above this rate is called out positively.
const ADHERENCE_HIGH: f64 = 0.90;
/// Reminder completion below this rate raises concern.
const REMINDER_COMPLETION_GOOD: f64 = 0.80;
/// At most this many low-adherence medications are named.
const MAX_NAMED_MEDICATIONS: usize = 3;

pub fn generate_insights(
    medication_adherence: f64,
    medications_detail: &[MedicationAdherenceDetail],
    appointments: &AppointmentSummary,
    reminders: &ReminderStats,
    care_team: &[CareTeamActivity],
) -> Vec<String> {
    let mut insights = Vec::new();

    // Overall adherence bands. A flat 0.0 with no doses stays silent.
    if medication_adherence >= ADHERENCE_HIGH {
        insights.push(
            "Excellent medication adherence (90% or above). The treatment plan is being followed closely."
                .to_string(),
        );
    } else if medication_adherence >= ADHERENCE_LOW {
        insights.push(
            "Moderate medication adherence (70-90%). Consider reinforcing reminders.".to_string(),
        );
    } else if medication_adherence > 0.0 {
        insights.push(
            "Low medication adherence (below 70%). The care team should intervene promptly."
                .to_string(),
        );
    }

    // Problem medications, up to three by name.
    let problem_names: Vec<&str> = medications_detail
        .iter()
        .filter(|m| m.adherence_rate < ADHERENCE_LOW && m.total_doses > 0)
        .take(MAX_NAMED_MEDICATIONS)
        .map(|m| m.medication_name.as_str())
        .collect();
    if !problem_names.is_empty() {
        insights.push(format!(
            "Medications with low adherence: {}",
            problem_names.join(", ")
        ));
    }

    // Appointments.
    if appointments.missed > 0 {
        insights.push(format!(
            "{} missed appointment(s) in this period. Consider more frequent reminders.",
            appointments.missed
        ));
    }
    if appointments.total > 0 && appointments.completed == appointments.total {
        insights.push("All medical appointments in this period were completed.".to_string());
    }

    // Reminder completion.
    if reminders.total > 0 {
        let completion = f64::from(reminders.completed) / f64::from(reminders.total);
        let pct = completion * 100.0;
        if completion >= REMINDER_COMPLETION_GOOD {
            insights.push(format!("High reminder completion rate ({pct:.0}%)."));
        } else {
            insights.push(format!(
                "Low reminder completion rate ({pct:.0}%). Review whether reminders are reaching the senior."
            ));
        }
    }

    // Care team engagement. Input is sorted most-active first.
    let active: Vec<&CareTeamActivity> =
        care_team.iter().filter(|m| m.actions_count > 0).collect();
    if active.is_empty() && !care_team.is_empty() {
        insights.push(
            "No care team member recorded any activity in this period.".to_string(),
        );
    } else if let Some(most_active) = active.first() {
        insights.push(format!(
            "Most active care team member: {} ({}) with {} actions.",
            most_active.user_name,
            most_active.role.as_str(),
            most_active.actions_count
        ));
    }

    insights
}
