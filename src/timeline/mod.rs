//! Patient timeline: care plans, the pain curve and scheduled care steps of
//! a single patient, assembled into one payload.

mod fetch;
mod types;

pub use types::*;

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{get_care_plans_for_patient, get_patient, DatabaseError};
use fetch::{fetch_pain_points, fetch_step_points};

pub fn get_patient_timeline(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<PatientTimeline, DatabaseError> {
    let patient = get_patient(conn, patient_id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "patient".into(),
        id: patient_id.to_string(),
    })?;

    let timeline = PatientTimeline {
        plans: get_care_plans_for_patient(conn, patient_id)?,
        pain: fetch_pain_points(conn, patient_id)?,
        steps: fetch_step_points(conn, patient_id)?,
        patient,
    };

    tracing::debug!(
        patient_id = %patient_id,
        plans = timeline.plans.len(),
        pain = timeline.pain.len(),
        steps = timeline.steps.len(),
        "Timeline assembled"
    );

    Ok(timeline)
}

// ── Tests ──────────────────────────────────────────────────────────────────
