//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stores an enum as its `as_str()` label in a Postgres TEXT column and
/// decodes it back through `FromStr`.
macro_rules! pg_text_enum {
    ($ty:ty) => {
        impl sqlx::Type<sqlx::Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let raw = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
                raw.parse::<$ty>().map_err(Into::into)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// InstrumentStatus
// ---------------------------------------------------------------------------

/// Operational status of an instrument, always set by a user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentStatus {
    #[default]
    Operational,
    NeedsMaintenance,
    OutOfService,
    Archived,
}

impl InstrumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentStatus::Operational => "operational",
            InstrumentStatus::NeedsMaintenance => "needs_maintenance",
            InstrumentStatus::OutOfService => "out_of_service",
            InstrumentStatus::Archived => "archived",
        }
    }

    /// Archived and out-of-service instruments are left out of overdue accounting
    pub fn tracks_overdue(&self) -> bool {
        !matches!(self, InstrumentStatus::Archived | InstrumentStatus::OutOfService)
    }
}

impl std::fmt::Display for InstrumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InstrumentStatus::Operational => "Operational",
            InstrumentStatus::NeedsMaintenance => "Needs Maintenance",
            InstrumentStatus::OutOfService => "Out of Service",
            InstrumentStatus::Archived => "Archived",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for InstrumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match key.as_str() {
            "operational" => Ok(InstrumentStatus::Operational),
            "needs_maintenance" => Ok(InstrumentStatus::NeedsMaintenance),
            "out_of_service" => Ok(InstrumentStatus::OutOfService),
            "archived" => Ok(InstrumentStatus::Archived),
            _ => Err(format!("Invalid instrument status: {}", s)),
        }
    }
}

pg_text_enum!(InstrumentStatus);

// ---------------------------------------------------------------------------
// MaintenanceEventType
// ---------------------------------------------------------------------------

/// Kind of maintenance event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceEventType {
    #[default]
    Scheduled,
    Unscheduled,
    Emergency,
}

impl MaintenanceEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceEventType::Scheduled => "scheduled",
            MaintenanceEventType::Unscheduled => "unscheduled",
            MaintenanceEventType::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for MaintenanceEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MaintenanceEventType::Scheduled => "Scheduled",
            MaintenanceEventType::Unscheduled => "Unscheduled",
            MaintenanceEventType::Emergency => "Emergency",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for MaintenanceEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(MaintenanceEventType::Scheduled),
            "unscheduled" => Ok(MaintenanceEventType::Unscheduled),
            "emergency" => Ok(MaintenanceEventType::Emergency),
            _ => Err(format!("Invalid maintenance event type: {}", s)),
        }
    }
}

pg_text_enum!(MaintenanceEventType);

// ---------------------------------------------------------------------------
// MaintenanceType
// ---------------------------------------------------------------------------

/// Reporting category of an instrument's maintenance plan.
///
/// Parsing is lenient: the historical labels used by the dashboard ("PM",
/// "Preventative Maintenance", "3 Months", ...) are accepted and anything
/// unrecognised lands in [`MaintenanceType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum MaintenanceType {
    PreventiveMaintenance,
    Amc,
    Calibration,
    Validation,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
    Other,
}

impl MaintenanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::PreventiveMaintenance => "preventive_maintenance",
            MaintenanceType::Amc => "amc",
            MaintenanceType::Calibration => "calibration",
            MaintenanceType::Validation => "validation",
            MaintenanceType::Daily => "daily",
            MaintenanceType::Weekly => "weekly",
            MaintenanceType::Monthly => "monthly",
            MaintenanceType::Quarterly => "quarterly",
            MaintenanceType::SemiAnnual => "semi_annual",
            MaintenanceType::Annual => "annual",
            MaintenanceType::Other => "other",
        }
    }
}

impl std::fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MaintenanceType::PreventiveMaintenance => "Preventive Maintenance",
            MaintenanceType::Amc => "AMC",
            MaintenanceType::Calibration => "Calibration",
            MaintenanceType::Validation => "Validation",
            MaintenanceType::Daily => "Daily",
            MaintenanceType::Weekly => "Weekly",
            MaintenanceType::Monthly => "Monthly",
            MaintenanceType::Quarterly => "3 Months",
            MaintenanceType::SemiAnnual => "6 Months",
            MaintenanceType::Annual => "1 Year",
            MaintenanceType::Other => "Other",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for MaintenanceType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MaintenanceType::from(s))
    }
}

impl From<&str> for MaintenanceType {
    fn from(s: &str) -> Self {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match key.as_str() {
            "pm" | "preventive_maintenance" | "preventative_maintenance" => {
                MaintenanceType::PreventiveMaintenance
            }
            "amc" => MaintenanceType::Amc,
            "calibration" => MaintenanceType::Calibration,
            "validation" => MaintenanceType::Validation,
            "daily" => MaintenanceType::Daily,
            "weekly" => MaintenanceType::Weekly,
            "monthly" => MaintenanceType::Monthly,
            "quarterly" | "3_months" => MaintenanceType::Quarterly,
            "semi_annual" | "6_months" => MaintenanceType::SemiAnnual,
            "annual" | "yearly" | "1_year" => MaintenanceType::Annual,
            _ => MaintenanceType::Other,
        }
    }
}

impl From<String> for MaintenanceType {
    fn from(s: String) -> Self {
        MaintenanceType::from(s.as_str())
    }
}

pg_text_enum!(MaintenanceType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "operational".parse::<InstrumentStatus>().unwrap(),
            InstrumentStatus::Operational
        );
        assert_eq!(
            "Needs Maintenance".parse::<InstrumentStatus>().unwrap(),
            InstrumentStatus::NeedsMaintenance
        );
        assert_eq!(
            "out-of-service".parse::<InstrumentStatus>().unwrap(),
            InstrumentStatus::OutOfService
        );
        assert!("broken".parse::<InstrumentStatus>().is_err());
    }

    #[test]
    fn test_status_tracks_overdue() {
        assert!(InstrumentStatus::Operational.tracks_overdue());
        assert!(InstrumentStatus::NeedsMaintenance.tracks_overdue());
        assert!(!InstrumentStatus::OutOfService.tracks_overdue());
        assert!(!InstrumentStatus::Archived.tracks_overdue());
    }

    #[test]
    fn test_maintenance_type_labels() {
        assert_eq!(MaintenanceType::from("PM"), MaintenanceType::PreventiveMaintenance);
        assert_eq!(
            MaintenanceType::from("Preventative Maintenance"),
            MaintenanceType::PreventiveMaintenance
        );
        assert_eq!(MaintenanceType::from("3 Months"), MaintenanceType::Quarterly);
        assert_eq!(MaintenanceType::from("1 Year"), MaintenanceType::Annual);
        assert_eq!(MaintenanceType::from("calibration"), MaintenanceType::Calibration);
        assert_eq!(MaintenanceType::from("Bi-weekly rinse"), MaintenanceType::Other);
        assert_eq!(MaintenanceType::from(""), MaintenanceType::Other);
    }

    #[test]
    fn test_maintenance_type_deserializes_leniently() {
        let parsed: MaintenanceType = serde_json::from_str("\"6 Months\"").unwrap();
        assert_eq!(parsed, MaintenanceType::SemiAnnual);
        let parsed: MaintenanceType = serde_json::from_str("\"whatever\"").unwrap();
        assert_eq!(parsed, MaintenanceType::Other);
        assert_eq!(
            serde_json::to_string(&MaintenanceType::SemiAnnual).unwrap(),
            "\"semi_annual\""
        );
    }

    #[test]
    fn test_maintenance_type_storage_label_round_trips() {
        for ty in [
            MaintenanceType::PreventiveMaintenance,
            MaintenanceType::SemiAnnual,
            MaintenanceType::Other,
        ] {
            assert_eq!(MaintenanceType::from(ty.as_str()), ty);
        }
    }

    #[test]
    fn test_event_type_serde() {
        let json = serde_json::to_string(&MaintenanceEventType::Emergency).unwrap();
        assert_eq!(json, "\"emergency\"");
        let parsed: MaintenanceEventType = serde_json::from_str("\"unscheduled\"").unwrap();
        assert_eq!(parsed, MaintenanceEventType::Unscheduled);
    }
}
