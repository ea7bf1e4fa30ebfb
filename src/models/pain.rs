use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Self-reported pain level on the 0–10 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainAssessment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub encounter_id: Option<Uuid>,
    pub recorded_at: NaiveDate,
    pub score: u8,
    pub notes: String,
}
