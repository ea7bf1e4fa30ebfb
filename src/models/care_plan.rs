use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Protocol;

/// Multi-week treatment protocol assigned to one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarePlan {
    pub id: Uuid,
    pub patient_id: Uuid,
    /// Free-text clinical label, e.g. "Chronic low back pain".
    pub diagnosis: String,
    pub protocol: Protocol,
    pub start_date: NaiveDate,
    pub goal_pain_score: u8,
}

/// One treatment session within a care plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareStep {
    pub id: Uuid,
    pub care_plan_id: Uuid,
    pub procedure_id: Uuid,
    pub scheduled_at: NaiveDate,
    pub done_at: Option<NaiveDate>,
    pub notes: String,
}

impl CareStep {
    /// Completion date when the session happened, otherwise the planned date.
    pub fn effective_date(&self) -> NaiveDate {
        self.done_at.unwrap_or(self.scheduled_at)
    }
}
