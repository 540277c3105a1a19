//! Directory endpoints: employees, lookup tables and the caller's profile

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        directory::{EmployeeListItem, EmployeeQuery, ValidIdType, VisitPurpose},
        user::StaffProfile,
    },
};

use super::AuthenticatedUser;

/// Employee directory with open-slot counts
#[utoipa::path(
    get,
    path = "/employees",
    tag = "directory",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employees", body = Vec<EmployeeListItem>)
    )
)]
pub async fn list_employees(
    State(state): State<crate::AppState>,
    Query(query): Query<EmployeeQuery>,
) -> AppResult<Json<Vec<EmployeeListItem>>> {
    let employees = state.services.directory.list_employees(&query).await?;
    Ok(Json(employees))
}

/// Visit purposes
#[utoipa::path(
    get,
    path = "/purposes",
    tag = "directory",
    responses(
        (status = 200, description = "Visit purposes", body = Vec<VisitPurpose>)
    )
)]
pub async fn list_purposes(State(state): State<crate::AppState>) -> AppResult<Json<Vec<VisitPurpose>>> {
    let purposes = state.services.directory.list_purposes().await?;
    Ok(Json(purposes))
}

/// Identity documents accepted at check-in
#[utoipa::path(
    get,
    path = "/valid-id-types",
    tag = "directory",
    responses(
        (status = 200, description = "Valid ID types", body = Vec<ValidIdType>)
    )
)]
pub async fn list_valid_id_types(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<ValidIdType>>> {
    let id_types = state.services.directory.list_valid_id_types().await?;
    Ok(Json(id_types))
}

/// Profile of the authenticated staff member
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = StaffProfile),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<StaffProfile>> {
    let profile = state.services.directory.profile(&claims).await?;
    Ok(Json(profile))
}
