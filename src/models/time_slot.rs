//! Employee availability slots

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// One bookable interval for one employee on one date.
///
/// `start_time` / `end_time` are `HH:MM` strings; both empty means the slot is
/// a date placeholder whose hours are not decided yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: i32,
    pub employee_id: i32,
    pub slot_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub crea_date: Option<DateTime<Utc>>,
}

impl TimeSlot {
    pub fn is_placeholder(&self) -> bool {
        self.start_time.is_empty() && self.end_time.is_empty()
    }
}

/// Slot listing entry for the owning employee's dashboard
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotWithBooking {
    pub id: i32,
    pub employee_id: i32,
    pub slot_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    /// A visit currently holds this slot
    pub is_booked: bool,
}

/// Create a date placeholder (no hours yet)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatePlaceholder {
    #[validate(required(message = "employeeId is required"))]
    pub employee_id: Option<i32>,
    /// Date (YYYY-MM-DD or RFC 3339 timestamp)
    #[validate(required(message = "date is required"))]
    pub date: Option<String>,
}

/// Create a slot, or update the slot named by `slotId`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTimeSlot {
    #[validate(required(message = "employeeId is required"))]
    pub employee_id: Option<i32>,
    /// Date (YYYY-MM-DD or RFC 3339 timestamp)
    #[validate(required(message = "date is required"))]
    pub date: Option<String>,
    /// Start time (HH:MM, H:MM or h:MM AM/PM); empty for a placeholder
    #[serde(default)]
    pub start_time: String,
    /// End time, same formats as `startTime`
    #[serde(default)]
    pub end_time: String,
    /// Existing slot to update
    pub slot_id: Option<i32>,
}

/// Normalized slot values ready for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotValues {
    pub employee_id: i32,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}
