//! Visitor model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A person visiting an employee. Walk-in registrations carry an empty
/// password; self-service accounts are managed elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Identity fields used to find or create a visitor
#[derive(Debug, Clone)]
pub struct VisitorIdentity {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
}
