//! Employees, departments and the small lookup tables the dashboards read

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i32,
    pub name: String,
}

/// Employee (visit host) with availability summary
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListItem {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
    /// Number of slots currently open for booking
    pub available_slots: i64,
}

/// Query parameters for the employee directory
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQuery {
    /// Case-insensitive match on first or last name
    pub search: Option<String>,
    pub department_id: Option<i32>,
    /// Only employees with at least one open slot
    #[serde(default)]
    pub only_available: bool,
}

/// Reason for a visit
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitPurpose {
    pub id: i32,
    pub name: String,
}

/// Identity document a visitor may present at check-in
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidIdType {
    pub id: i32,
    pub name: String,
}
