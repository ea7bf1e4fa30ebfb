//! Appointment dashboard: KPIs over a filtered slice of the schedule.
//!
//! A caller-supplied `DashboardQuery` is resolved into a `DashboardFilter`
//! (time window, status, provider). The filter becomes one `AppointmentScope`
//! that every aggregation stage reuses: status counts, visit durations, the
//! daily series, the specialty breakdown, top diagnoses, procedure volume and
//! the revenue estimate. Reduction to rates and averages is pure Rust.

mod aggregates;
mod fetch;
mod types;
mod window;

pub use aggregates::*;
pub use types::*;
pub use window::*;

// ── Tests ──────────────────────────────────────────────────────────────────
