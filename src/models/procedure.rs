use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureCategory {
    pub id: Uuid,
    pub name: String,
}

/// Catalog entry for a billable procedure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Procedure {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub category_id: Uuid,
    pub duration_estimate_min: u16,
    pub requires_image_guidance: bool,
    pub price: f64,
}
