//! Health reporting — adherence aggregation, activity profiling, and
//! rule-based insights over one senior's period of care data.
//!
//! The aggregation and insight functions are pure; `fetch` holds the
//! read-only queries the report needs and `aggregates` assembles the
//! full report. A failure in any sub-query fails the whole report so
//! insights are never derived from partial figures.

pub mod activity;
pub mod adherence;
pub mod aggregates;
pub mod fetch;
pub mod insights;
pub mod types;

pub use aggregates::*;
pub use types::*;
