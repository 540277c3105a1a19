//! Shared domain enums (approval axis, check-in axis, staff roles)

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// ApprovalStatus
// ---------------------------------------------------------------------------

/// Approval status of a visit, persisted as a reference into `approval_statuses`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ApprovalStatus {
    #[serde(rename = "Waiting For Approval")]
    WaitingForApproval,
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Partial Approved")]
    PartialApproved,
    #[serde(rename = "Nurse Approved")]
    NurseApproved,
    #[serde(rename = "Blocked")]
    Blocked,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl ApprovalStatus {
    pub const ALL: [ApprovalStatus; 6] = [
        ApprovalStatus::WaitingForApproval,
        ApprovalStatus::Approved,
        ApprovalStatus::PartialApproved,
        ApprovalStatus::NurseApproved,
        ApprovalStatus::Blocked,
        ApprovalStatus::Cancelled,
    ];

    /// Name as stored in the `approval_statuses` lookup table
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::WaitingForApproval => "Waiting For Approval",
            ApprovalStatus::Approved => "Approved",
            ApprovalStatus::PartialApproved => "Partial Approved",
            ApprovalStatus::NurseApproved => "Nurse Approved",
            ApprovalStatus::Blocked => "Blocked",
            ApprovalStatus::Cancelled => "Cancelled",
        }
    }

    /// Blocked and Cancelled end the approval axis
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApprovalStatus::Blocked | ApprovalStatus::Cancelled)
    }

    /// Entering this status unbinds the visit's time slot
    pub fn releases_slot(&self) -> bool {
        self.is_terminal()
    }

    /// Whether a visit in this status may be checked in
    pub fn admits_check_in(&self) -> bool {
        matches!(self, ApprovalStatus::Approved | ApprovalStatus::NurseApproved)
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        ApprovalStatus::ALL
            .into_iter()
            .find(|status| normalize_name(status.as_str()) == wanted)
            .ok_or_else(|| format!("Unknown approval status: {}", s.trim()))
    }
}

impl sqlx::Type<Postgres> for ApprovalStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for ApprovalStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for ApprovalStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

// ---------------------------------------------------------------------------
// CheckInStatus
// ---------------------------------------------------------------------------

/// Physical presence of the visitor on site. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CheckInStatus {
    #[serde(rename = "Checked In")]
    CheckedIn,
    #[serde(rename = "Ongoing")]
    Ongoing,
    #[serde(rename = "Checked Out")]
    CheckedOut,
}

impl CheckInStatus {
    pub const ALL: [CheckInStatus; 3] = [
        CheckInStatus::CheckedIn,
        CheckInStatus::Ongoing,
        CheckInStatus::CheckedOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInStatus::CheckedIn => "Checked In",
            CheckInStatus::Ongoing => "Ongoing",
            CheckInStatus::CheckedOut => "Checked Out",
        }
    }

    /// Position on the check-in axis; a visit with no status has rank 0
    pub fn rank(&self) -> u8 {
        match self {
            CheckInStatus::CheckedIn => 1,
            CheckInStatus::Ongoing => 2,
            CheckInStatus::CheckedOut => 3,
        }
    }

    /// Statuses that stamp time-in (as opposed to time-out)
    pub fn records_time_in(&self) -> bool {
        !matches!(self, CheckInStatus::CheckedOut)
    }
}

impl std::fmt::Display for CheckInStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CheckInStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        CheckInStatus::ALL
            .into_iter()
            .find(|status| normalize_name(status.as_str()) == wanted)
            .ok_or_else(|| format!("Unknown check-in status: {}", s.trim()))
    }
}

impl sqlx::Type<Postgres> for CheckInStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for CheckInStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for CheckInStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Staff role carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Security,
    Nurse,
    Hr,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Security => "security",
            Role::Nurse => "nurse",
            Role::Hr => "hr",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "security" => Ok(Role::Security),
            "nurse" => Ok(Role::Nurse),
            "hr" => Ok(Role::Hr),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

/// Lowercase and collapse whitespace so "checked  In" matches "Checked In"
fn normalize_name(s: &str) -> String {
    s.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_status_parse_is_lenient() {
        assert_eq!(
            "waiting for approval".parse::<ApprovalStatus>(),
            Ok(ApprovalStatus::WaitingForApproval)
        );
        assert_eq!(
            "  Partial   Approved ".parse::<ApprovalStatus>(),
            Ok(ApprovalStatus::PartialApproved)
        );
        assert!("Rejected".parse::<ApprovalStatus>().is_err());
    }

    #[test]
    fn test_approval_status_serde_uses_display_names() {
        let json = serde_json::to_string(&ApprovalStatus::NurseApproved).unwrap();
        assert_eq!(json, "\"Nurse Approved\"");
        let back: ApprovalStatus = serde_json::from_str("\"Blocked\"").unwrap();
        assert_eq!(back, ApprovalStatus::Blocked);
    }

    #[test]
    fn test_terminal_statuses_release_slot() {
        for status in ApprovalStatus::ALL {
            assert_eq!(
                status.releases_slot(),
                matches!(status, ApprovalStatus::Blocked | ApprovalStatus::Cancelled)
            );
        }
    }

    #[test]
    fn test_check_in_status_parse() {
        assert_eq!("checked in".parse::<CheckInStatus>(), Ok(CheckInStatus::CheckedIn));
        assert_eq!("ONGOING".parse::<CheckInStatus>(), Ok(CheckInStatus::Ongoing));
        assert_eq!("Checked Out".parse::<CheckInStatus>(), Ok(CheckInStatus::CheckedOut));
        assert!("arrived".parse::<CheckInStatus>().is_err());
    }

    #[test]
    fn test_check_in_ranks_increase() {
        assert!(CheckInStatus::CheckedIn.rank() < CheckInStatus::Ongoing.rank());
        assert!(CheckInStatus::Ongoing.rank() < CheckInStatus::CheckedOut.rank());
        assert!(!CheckInStatus::CheckedOut.records_time_in());
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("HR".parse::<Role>(), Ok(Role::Hr));
        assert_eq!(Role::Nurse.to_string(), "nurse");
        assert!("visitor".parse::<Role>().is_err());
    }
}
