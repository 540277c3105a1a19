//! High-care clearance: nurse screening before restricted-area access

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{ApprovalStatus, CheckInStatus};

/// Nurse-issued clearance for one visit. Immutable once created; the most
/// recent request (highest id) for a visit is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighCareRequest {
    pub id: i32,
    pub visit_id: i32,
    pub nurse_id: i32,
    pub approved: bool,
    /// Area codes, e.g. "DC"
    pub areas: Vec<String>,
    /// Protective gear codes, e.g. "Gloves"
    pub equipment: Vec<String>,
    pub permission_type: String,
    pub comments: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub crea_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHighCareRequest {
    /// Admin only; a nurse always acts as themselves
    pub nurse_id: Option<i32>,
    #[serde(default)]
    pub areas: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[validate(
        required(message = "permissionType is required"),
        length(min = 1, message = "permissionType is required")
    )]
    pub permission_type: Option<String>,
    pub comments: Option<String>,
}

/// Normalized clearance values ready for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHighCareRequest {
    pub visit_id: i32,
    pub nurse_id: i32,
    pub areas: Vec<String>,
    pub equipment: Vec<String>,
    pub permission_type: String,
    pub comments: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighCareRequestResponse {
    pub request_id: i32,
    pub request: HighCareRequest,
}

/// One questionnaire line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationAnswer {
    #[validate(length(min = 1, max = 255, message = "question must be 1-255 characters"))]
    pub question: String,
    pub answer: bool,
    pub remarks: Option<String>,
}

/// Health questionnaire plus personal-items checklist for a high-care request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitHealthDeclaration {
    /// Admin only; a nurse always acts as themselves
    pub nurse_id: Option<i32>,
    #[validate(
        length(min = 1, message = "symptoms must not be empty"),
        nested
    )]
    pub symptoms: Vec<DeclarationAnswer>,
    #[validate(
        length(min = 1, message = "prohibitedItems must not be empty"),
        nested
    )]
    pub prohibited_items: Vec<DeclarationAnswer>,
}

/// Stored symptom questionnaire (one per high-care request)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SymptomDeclaration {
    pub id: i32,
    pub request_id: i32,
    pub nurse_id: i32,
    #[schema(value_type = Vec<DeclarationAnswer>)]
    pub answers: Json<Vec<DeclarationAnswer>>,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Stored prohibited-items checklist (one per high-care request)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProhibitedItemsDeclaration {
    pub id: i32,
    pub request_id: i32,
    pub nurse_id: i32,
    #[schema(value_type = Vec<DeclarationAnswer>)]
    pub answers: Json<Vec<DeclarationAnswer>>,
    pub crea_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthDeclarationResponse {
    pub request_id: i32,
    pub symptoms: SymptomDeclaration,
    pub prohibited_items: ProhibitedItemsDeclaration,
    pub message: String,
}

/// Visit routed through the clinic, with its latest clearance if any
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighCareVisit {
    pub visit_id: i32,
    pub visit_date: NaiveDate,
    pub expected_time: String,
    pub approval_status: ApprovalStatus,
    pub check_in_status: Option<CheckInStatus>,
    pub visitor_id: i32,
    pub visitor_name: String,
    pub employee_id: i32,
    pub employee_name: String,
    pub department_name: Option<String>,
    pub purpose_name: String,
    pub request_id: Option<i32>,
    pub nurse_id: Option<i32>,
    pub approved: Option<bool>,
    pub areas: Option<Vec<String>>,
    pub equipment: Option<Vec<String>>,
    pub permission_type: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    /// Symptom and prohibited-items declarations were submitted
    pub has_declaration: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighCareVisitQuery {
    /// Visit date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
    pub employee_id: Option<i32>,
}
