//! Visit model and related request/response types

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{ApprovalStatus, CheckInStatus, Role};

/// Visit row, with the approval status resolved to its name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: i32,
    pub visitor_id: i32,
    pub employee_id: i32,
    pub purpose_id: i32,
    pub visit_date: NaiveDate,
    /// Bound slot; null once the visit is blocked, cancelled or checked out
    pub time_slot_id: Option<i32>,
    /// Display string such as "8:00 AM - 10:00 AM"
    pub expected_time: String,
    #[schema(value_type = Option<String>)]
    pub time_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub time_out: Option<NaiveTime>,
    pub approval_status: ApprovalStatus,
    pub check_in_status: Option<CheckInStatus>,
    pub valid_id_type_id: Option<i32>,
    pub comment_id: Option<i32>,
    pub device_type: Option<String>,
    pub device_brand: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Visit joined with its visitor, host, purpose and comment for dashboards
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitDetails {
    pub id: i32,
    pub visit_date: NaiveDate,
    pub expected_time: String,
    pub time_slot_id: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub time_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub time_out: Option<NaiveTime>,
    pub approval_status: ApprovalStatus,
    pub check_in_status: Option<CheckInStatus>,
    pub visitor_id: i32,
    pub visitor_first_name: String,
    pub visitor_last_name: String,
    pub visitor_email: String,
    pub visitor_contact_number: Option<String>,
    pub employee_id: i32,
    pub employee_name: String,
    pub department_name: Option<String>,
    pub purpose_id: i32,
    pub purpose_name: String,
    pub valid_id_type_name: Option<String>,
    pub comment: Option<String>,
    pub device_type: Option<String>,
    pub device_brand: Option<String>,
}

/// Visit registration submitted by a visitor or by security on their behalf
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisit {
    #[validate(
        required(message = "firstName is required"),
        length(min = 1, message = "firstName is required")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "lastName is required"),
        length(min = 1, message = "lastName is required")
    )]
    pub last_name: Option<String>,
    #[validate(
        required(message = "email is required"),
        email(message = "Invalid email format")
    )]
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    #[validate(required(message = "visitedEmployeeId is required"))]
    pub visited_employee_id: Option<i32>,
    #[validate(required(message = "visitPurposeId is required"))]
    pub visit_purpose_id: Option<i32>,
    #[validate(required(message = "selectedTimeSlot is required"))]
    pub selected_time_slot: Option<i32>,
    pub device_type: Option<String>,
    pub device_brand: Option<String>,
}

/// Values of a visit row about to be inserted
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub visitor_id: i32,
    pub employee_id: i32,
    pub purpose_id: i32,
    pub visit_date: NaiveDate,
    pub time_slot_id: i32,
    pub expected_time: String,
    pub device_type: Option<String>,
    pub device_brand: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitResponse {
    pub visit_id: i32,
    pub visit: Visit,
    pub message: String,
}

/// Approval change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetApprovalRequest {
    /// e.g. "Approved", "Blocked"
    #[validate(
        required(message = "statusName is required"),
        length(min = 1, message = "statusName is required")
    )]
    pub status_name: Option<String>,
}

/// Check-in axis change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCheckInRequest {
    /// "checked in", "ongoing" or "checked out"
    #[validate(
        required(message = "status is required"),
        length(min = 1, message = "status is required")
    )]
    pub status: Option<String>,
    /// Identity document presented at check-in
    pub valid_id_type_id: Option<i32>,
}

/// Query parameters for visit listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitQuery {
    /// Visit date (YYYY-MM-DD)
    pub date: Option<String>,
    pub employee_id: Option<i32>,
    /// Approval status name
    pub approval_status: Option<String>,
}

/// Free-text note attached to a visit (one per visit)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitComment {
    pub id: i32,
    pub visit_id: i32,
    pub body: String,
    pub author_role: Role,
    pub author_id: i32,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertCommentRequest {
    #[validate(
        required(message = "comment is required"),
        length(min = 1, max = 2000, message = "comment must be 1-2000 characters")
    )]
    pub comment: Option<String>,
}

/// Generic acknowledgement returned by state-changing endpoints
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeResponse {
    pub visit_id: i32,
    pub message: String,
    pub visit: Visit,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> serde_json::Value {
        serde_json::json!({
            "firstName": "A",
            "lastName": "B",
            "email": "a@b.com",
            "visitedEmployeeId": 1,
            "visitPurposeId": 2,
            "selectedTimeSlot": 3
        })
    }

    #[test]
    fn test_create_visit_valid() {
        let req: CreateVisit = serde_json::from_value(full_request()).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_visit_missing_slot() {
        let mut body = full_request();
        body.as_object_mut().unwrap().remove("selectedTimeSlot");
        let req: CreateVisit = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("selected_time_slot"));
    }

    #[test]
    fn test_create_visit_rejects_bad_email_and_blank_name() {
        let mut body = full_request();
        body["email"] = serde_json::json!("not-an-email");
        body["firstName"] = serde_json::json!("");
        let req: CreateVisit = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("first_name"));
    }
}
