use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub full_name: String,
    /// Medical council registration (CRM), when known.
    pub crm: Option<String>,
    pub specialty: String,
}
