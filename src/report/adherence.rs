//! Adherence aggregation over intake history.
//!
//! Two granularities with deliberately different semantics: the
//! per-medication rate counts taken against taken + missed (late doses
//! shown separately), and the per-senior figure is the unweighted mean
//! of those rates. A medication with two doses weighs the same as one
//! with thirty; the insight thresholds are calibrated against exactly
//! this averaging, so it must not be replaced with a pooled rate.

use crate::models::{IntakeLog, IntakeStatus, Medication};

use super::types::{IntakeStats, MedicationAdherenceDetail};

/// Per-medication adherence over an already period-scoped log slice.
/// Every medication of the senior appears, including those with no
/// doses in range (rate 0.0).
pub fn medication_adherence(
    medications: &[Medication],
    logs: &[IntakeLog],
) -> Vec<MedicationAdherenceDetail> {
    medications
        .iter()
        .map(|med| {
            let mut taken = 0u32;
            let mut missed = 0u32;
            let mut late = 0u32;
            for log in logs.iter().filter(|l| l.medication_id == med.id) {
                match log.status {
                    IntakeStatus::Taken => taken += 1,
                    IntakeStatus::Missed | IntakeStatus::Skipped => missed += 1,
                    IntakeStatus::Late => late += 1,
                }
            }
            let total = taken + missed;
            let adherence_rate = if total > 0 {
                f64::from(taken) / f64::from(total)
            } else {
                0.0
            };
            MedicationAdherenceDetail {
                medication_id: med.id,
                medication_name: med.name.clone(),
                total_doses: total,
                taken,
                missed,
                late,
                adherence_rate,
            }
        })
        .collect()
}

/// Per-senior adherence: the unweighted mean of per-medication rates.
/// Zero medications yields 0.0, never NaN.
pub fn overall_adherence(details: &[MedicationAdherenceDetail]) -> f64 {
    if details.is_empty() {
        return 0.0;
    }
    details.iter().map(|d| d.adherence_rate).sum::<f64>() / details.len() as f64
}

/// Flat counters across all four statuses; the stats endpoint shape.
pub fn compute_intake_stats(logs: &[IntakeLog]) -> IntakeStats {
    let mut stats = IntakeStats::default();
    for log in logs {
        match log.status {
            IntakeStatus::Taken => stats.taken += 1,
            IntakeStatus::Missed => stats.missed += 1,
            IntakeStatus::Late => stats.late += 1,
            IntakeStatus::Skipped => stats.skipped += 1,
        }
    }
    stats.total_intakes = stats.taken + stats.missed + stats.late + stats.skipped;
    stats.adherence_rate = if stats.total_intakes > 0 {
        f64::from(stats.taken) / f64::from(stats.total_intakes)
    } else {
        0.0
    };
    stats
}
