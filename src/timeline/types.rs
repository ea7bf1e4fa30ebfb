use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CarePlan, Patient};

/// One pain assessment on the patient's curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PainPoint {
    pub date: NaiveDate,
    pub score: u8,
}

/// One care step; `date` is the completion date when set, else the scheduled one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPoint {
    pub date: NaiveDate,
    pub procedure: String,
    pub done: bool,
}

/// Full timeline payload for a single patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientTimeline {
    pub patient: Patient,
    pub plans: Vec<CarePlan>,
    pub pain: Vec<PainPoint>,
    pub steps: Vec<StepPoint>,
}
