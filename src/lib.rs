//! Cuida — elder-care coordination backend core.
//!
//! The medication schedule and adherence engine: expands recurring
//! medication schedules into reminder occurrences, classifies recorded
//! intakes (on time, late, missed, skipped), and aggregates intake
//! history into adherence figures, activity profiles and narrative
//! insights for care reports. Transport (REST/WebSocket) and account
//! management live in the surrounding services; this crate is invoked
//! in-process and owns the SQLite data layer for the care entities.

pub mod clock;
pub mod config;
pub mod db;
pub mod intake;
pub mod materialize;
pub mod medications;
pub mod models;
pub mod reminders;
pub mod report;
pub mod schedule;

use tracing_subscriber::EnvFilter;

/// Initialize tracing with RUST_LOG or the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
}
