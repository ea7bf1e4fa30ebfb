use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded clinical visit. Walk-ins carry no appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    pub id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub check_in: NaiveDateTime,
    pub check_out: Option<NaiveDateTime>,
    pub reason: String,
}

impl Encounter {
    /// Whole minutes between check-in and check-out, `None` while still open.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.check_out
            .map(|out| (out - self.check_in).num_seconds().div_euclid(60))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vitals {
    pub id: Uuid,
    pub encounter_id: Uuid,
    pub height_cm: Option<u16>,
    pub weight_kg: Option<u16>,
    pub systolic: Option<u16>,
    pub diastolic: Option<u16>,
    pub heart_rate: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn encounter(check_out: Option<&str>) -> Encounter {
        Encounter {
            id: Uuid::new_v4(),
            appointment_id: None,
            patient_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            check_in: at("2024-03-01 09:00:00"),
            check_out: check_out.map(at),
            reason: String::new(),
        }
    }

    #[test]
    fn duration_truncates_partial_minutes() {
        let enc = encounter(Some("2024-03-01 09:25:59"));
        assert_eq!(enc.duration_minutes(), Some(25));
    }

    #[test]
    fn duration_undefined_without_check_out() {
        assert_eq!(encounter(None).duration_minutes(), None);
    }

    #[test]
    fn zero_length_visit() {
        let enc = encounter(Some("2024-03-01 09:00:00"));
        assert_eq!(enc.duration_minutes(), Some(0));
    }
}
