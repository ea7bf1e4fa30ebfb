use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ICD-style diagnosis reference entry (e.g. `M54.5 - Low back pain`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    pub id: Uuid,
    pub code: String,
    pub description: String,
}
