use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Sex {
    Male => "M",
    Female => "F",
    Other => "O",
});

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Completed => "completed",
    NoShow => "no_show",
    Cancelled => "cancelled",
});

str_enum!(Protocol {
    Laser => "LASER",
    Infiltration => "INFIL",
    Block => "BLOCK",
    Radiofrequency => "RF",
    ShockWave => "ESWT",
});

impl Protocol {
    /// Every protocol, in reporting order.
    pub const ALL: [Protocol; 5] = [
        Protocol::Laser,
        Protocol::Infiltration,
        Protocol::Block,
        Protocol::Radiofrequency,
        Protocol::ShockWave,
    ];

    /// Human-readable name shown on reports.
    pub fn label(&self) -> &'static str {
        match self {
            Protocol::Laser => "High-power laser therapy",
            Protocol::Infiltration => "Joint/muscle infiltration",
            Protocol::Block => "Sympathetic/neuraxial block",
            Protocol::Radiofrequency => "Conventional/pulsed radiofrequency",
            Protocol::ShockWave => "Extracorporeal shock wave therapy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn appointment_status_round_trip() {
        for (variant, s) in [
            (AppointmentStatus::Scheduled, "scheduled"),
            (AppointmentStatus::Completed, "completed"),
            (AppointmentStatus::NoShow, "no_show"),
            (AppointmentStatus::Cancelled, "cancelled"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AppointmentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn protocol_codes_are_fixed() {
        let codes: Vec<&str> = Protocol::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(codes, vec!["LASER", "INFIL", "BLOCK", "RF", "ESWT"]);
        assert_eq!(Protocol::from_str("RF").unwrap(), Protocol::Radiofrequency);
    }

    #[test]
    fn protocol_serializes_as_code() {
        let json = serde_json::to_string(&Protocol::ShockWave).unwrap();
        assert_eq!(json, "\"ESWT\"");
        let back: Protocol = serde_json::from_str("\"INFIL\"").unwrap();
        assert_eq!(back, Protocol::Infiltration);
    }

    #[test]
    fn sex_uses_single_letter_codes() {
        assert_eq!(Sex::Female.as_str(), "F");
        assert_eq!(Sex::from_str("O").unwrap(), Sex::Other);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(Protocol::from_str("ACUPUNCTURE").is_err());
        assert!(Protocol::from_str("rf").is_err());
        assert!(AppointmentStatus::from_str("unknown").is_err());
        assert!(Sex::from_str("").is_err());
    }

    #[test]
    fn invalid_enum_names_the_field() {
        match Protocol::from_str("TENS") {
            Err(DatabaseError::InvalidEnum { field, value }) => {
                assert_eq!(field, "Protocol");
                assert_eq!(value, "TENS");
            }
            other => panic!("expected InvalidEnum, got {other:?}"),
        }
    }
}
