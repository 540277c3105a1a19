//! High-care clearance endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Role,
        high_care::{
            CreateHighCareRequest, HealthDeclarationResponse, HighCareRequestResponse,
            HighCareVisit, HighCareVisitQuery, SubmitHealthDeclaration,
        },
        user::UserClaims,
        visit::StatusChangeResponse,
    },
};

use super::{AuthenticatedUser, ValidJson};

/// The nurse acting: a nurse always acts as themselves, an admin names one
fn acting_nurse(claims: &UserClaims, requested: Option<i32>) -> AppResult<i32> {
    if claims.role == Role::Nurse {
        return Ok(claims.user_id);
    }
    requested.ok_or_else(|| AppError::Validation("nurseId is required".to_string()))
}

/// Issue a high-care clearance for a visit
#[utoipa::path(
    post,
    path = "/highcare/{visit_id}/request",
    tag = "high-care",
    security(("bearer_auth" = [])),
    params(("visit_id" = i32, Path, description = "Visit ID")),
    request_body = CreateHighCareRequest,
    responses(
        (status = 201, description = "Clearance issued", body = HighCareRequestResponse),
        (status = 404, description = "Visit not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Visit is blocked or cancelled", body = crate::error::ErrorResponse)
    )
)]
pub async fn request_clearance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(visit_id): Path<i32>,
    ValidJson(data): ValidJson<CreateHighCareRequest>,
) -> AppResult<(StatusCode, Json<HighCareRequestResponse>)> {
    claims.require_role(&[Role::Nurse])?;
    let nurse_id = acting_nurse(&claims, data.nurse_id)?;
    let request = state
        .services
        .high_care
        .request_clearance(visit_id, nurse_id, &data)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(HighCareRequestResponse {
            request_id: request.id,
            request,
        }),
    ))
}

/// Submit the health declaration for a visit's latest clearance
#[utoipa::path(
    post,
    path = "/health/{visit_id}/submit",
    tag = "high-care",
    security(("bearer_auth" = [])),
    params(("visit_id" = i32, Path, description = "Visit ID")),
    request_body = SubmitHealthDeclaration,
    responses(
        (status = 200, description = "Declaration stored", body = HealthDeclarationResponse),
        (status = 404, description = "No high-care request for the visit", body = crate::error::ErrorResponse),
        (status = 409, description = "Already submitted", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_health_declaration(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(visit_id): Path<i32>,
    ValidJson(data): ValidJson<SubmitHealthDeclaration>,
) -> AppResult<Json<HealthDeclarationResponse>> {
    claims.require_role(&[Role::Nurse])?;
    let nurse_id = acting_nurse(&claims, data.nurse_id)?;
    let response = state
        .services
        .high_care
        .submit_health_declaration(visit_id, nurse_id, &data)
        .await?;
    Ok(Json(response))
}

/// Mark a partially approved visit as Nurse Approved
#[utoipa::path(
    put,
    path = "/nurse/{visit_id}/approval",
    tag = "high-care",
    security(("bearer_auth" = [])),
    params(("visit_id" = i32, Path, description = "Visit ID")),
    responses(
        (status = 200, description = "Visit nurse approved", body = StatusChangeResponse),
        (status = 409, description = "Visit is not partially approved", body = crate::error::ErrorResponse),
        (status = 500, description = "Status lookup row missing", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_nurse_approved(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(visit_id): Path<i32>,
) -> AppResult<Json<StatusChangeResponse>> {
    claims.require_role(&[Role::Nurse])?;
    let visit = state.services.high_care.mark_nurse_approved(visit_id).await?;
    Ok(Json(StatusChangeResponse {
        visit_id: visit.id,
        message: format!("Visit is {}", visit.approval_status),
        visit,
    }))
}

/// Clinic worklist for a day
#[utoipa::path(
    get,
    path = "/nurse/high-care-visits",
    tag = "high-care",
    security(("bearer_auth" = [])),
    params(HighCareVisitQuery),
    responses(
        (status = 200, description = "High-care visits", body = Vec<HighCareVisit>)
    )
)]
pub async fn list_high_care_visits(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<HighCareVisitQuery>,
) -> AppResult<Json<Vec<HighCareVisit>>> {
    claims.require_role(&[Role::Nurse, Role::Security, Role::Hr])?;
    let visits = state.services.high_care.list_high_care_visits(&query).await?;
    Ok(Json(visits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acting_nurse_is_the_calling_nurse() {
        let nurse = UserClaims::new(5, Role::Nurse, "n", 1);
        assert_eq!(acting_nurse(&nurse, None).unwrap(), 5);
        assert_eq!(acting_nurse(&nurse, Some(8)).unwrap(), 5);

        let admin = UserClaims::new(1, Role::Admin, "a", 1);
        assert!(matches!(acting_nurse(&admin, None), Err(AppError::Validation(_))));
        assert_eq!(acting_nurse(&admin, Some(8)).unwrap(), 8);
    }
}
