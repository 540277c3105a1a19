//! Visitor-keyed endpoints acting on the visitor's most recent visit

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::visit::{SetApprovalRequest, SetCheckInRequest, StatusChangeResponse},
};

use super::{
    visits::{check_in_response, APPROVERS, GATE_KEEPERS},
    AuthenticatedUser, ValidJson,
};

/// Record check-in progress on the visitor's latest visit
#[utoipa::path(
    put,
    path = "/visitors/{id}/status",
    tag = "visitors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visitor ID")),
    request_body = SetCheckInRequest,
    responses(
        (status = 200, description = "Check-in updated", body = StatusChangeResponse),
        (status = 400, description = "Unknown status or outside the expected window", body = crate::error::ErrorResponse),
        (status = 404, description = "Visitor or visit not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Transition not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_visitor_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(visitor_id): Path<i32>,
    ValidJson(data): ValidJson<SetCheckInRequest>,
) -> AppResult<Json<StatusChangeResponse>> {
    claims.require_role(GATE_KEEPERS)?;
    let visit = state
        .services
        .visits
        .set_check_in_for_visitor(
            visitor_id,
            data.status.as_deref().unwrap_or_default(),
            data.valid_id_type_id,
        )
        .await?;
    Ok(Json(check_in_response(visit)))
}

/// Approve, partially approve, block or cancel the visitor's latest visit
#[utoipa::path(
    put,
    path = "/visitors/{id}/approval",
    tag = "visitors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visitor ID")),
    request_body = SetApprovalRequest,
    responses(
        (status = 200, description = "Approval updated", body = StatusChangeResponse),
        (status = 400, description = "Status not accepted here", body = crate::error::ErrorResponse),
        (status = 409, description = "Transition not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_visitor_approval(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(visitor_id): Path<i32>,
    ValidJson(data): ValidJson<SetApprovalRequest>,
) -> AppResult<Json<StatusChangeResponse>> {
    claims.require_role(APPROVERS)?;
    let visit = state
        .services
        .visits
        .set_approval_for_visitor(visitor_id, data.status_name.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(StatusChangeResponse {
        visit_id: visit.id,
        message: format!("Visit is {}", visit.approval_status),
        visit,
    }))
}
