//! Visit API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Role,
        visit::{
            CreateVisit, CreateVisitResponse, SetApprovalRequest, SetCheckInRequest,
            StatusChangeResponse, UpsertCommentRequest, Visit, VisitComment, VisitDetails,
            VisitQuery,
        },
    },
};

use super::{AuthenticatedUser, ValidJson};

/// Roles allowed to decide on a visit
pub(crate) const APPROVERS: &[Role] = &[Role::Security, Role::Hr];
/// Roles allowed to record arrivals and departures
pub(crate) const GATE_KEEPERS: &[Role] = &[Role::Security];

/// Register a visit
#[utoipa::path(
    post,
    path = "/visits",
    tag = "visits",
    request_body = CreateVisit,
    responses(
        (status = 201, description = "Visit registered", body = CreateVisitResponse),
        (status = 400, description = "Missing fields or invalid slot", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot booked or in the past", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_visit(
    State(state): State<crate::AppState>,
    ValidJson(data): ValidJson<CreateVisit>,
) -> AppResult<(StatusCode, Json<CreateVisitResponse>)> {
    let visit = state.services.visits.create_visit(&data).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateVisitResponse {
            visit_id: visit.id,
            visit,
            message: "Visit request submitted".to_string(),
        }),
    ))
}

/// List visits, newest first. Employees only see the visits they host.
#[utoipa::path(
    get,
    path = "/visits",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(VisitQuery),
    responses(
        (status = 200, description = "Visits", body = Vec<VisitDetails>)
    )
)]
pub async fn list_visits(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<VisitQuery>,
) -> AppResult<Json<Vec<VisitDetails>>> {
    let host = (claims.role == Role::Employee).then_some(claims.user_id);
    let visits = state.services.visits.list(&query, host).await?;
    Ok(Json(visits))
}

/// Get one visit
#[utoipa::path(
    get,
    path = "/visits/{id}",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visit ID")),
    responses(
        (status = 200, description = "Visit details", body = VisitDetails),
        (status = 404, description = "Visit not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_visit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<VisitDetails>> {
    let visit = state.services.visits.get(id).await?;
    if claims.role == Role::Employee && visit.employee_id != claims.user_id {
        return Err(AppError::Authorization(
            "Employees can only view the visits they host".to_string(),
        ));
    }
    Ok(Json(visit))
}

/// Change a visit's approval status
#[utoipa::path(
    put,
    path = "/visits/{id}/approval",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visit ID")),
    request_body = SetApprovalRequest,
    responses(
        (status = 200, description = "Approval updated", body = StatusChangeResponse),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse),
        (status = 409, description = "Transition not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_approval_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidJson(data): ValidJson<SetApprovalRequest>,
) -> AppResult<Json<StatusChangeResponse>> {
    claims.require_role(APPROVERS)?;
    let visit = state
        .services
        .visits
        .set_approval_status(id, data.status_name.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(StatusChangeResponse {
        visit_id: visit.id,
        message: format!("Visit is {}", visit.approval_status),
        visit,
    }))
}

/// Record check-in progress on a visit
#[utoipa::path(
    put,
    path = "/visits/{id}/check-in",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visit ID")),
    request_body = SetCheckInRequest,
    responses(
        (status = 200, description = "Check-in updated", body = StatusChangeResponse),
        (status = 400, description = "Unknown status or outside the expected window", body = crate::error::ErrorResponse),
        (status = 409, description = "Transition not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn set_check_in_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidJson(data): ValidJson<SetCheckInRequest>,
) -> AppResult<Json<StatusChangeResponse>> {
    claims.require_role(GATE_KEEPERS)?;
    let visit = state
        .services
        .visits
        .set_check_in_status(id, data.status.as_deref().unwrap_or_default(), data.valid_id_type_id)
        .await?;
    Ok(Json(check_in_response(visit)))
}

pub(crate) fn check_in_response(visit: Visit) -> StatusChangeResponse {
    let message = match visit.check_in_status {
        Some(status) => format!("Visitor is {}", status),
        None => "Check-in status unchanged".to_string(),
    };
    StatusChangeResponse {
        visit_id: visit.id,
        message,
        visit,
    }
}

/// Create or replace the comment on a visit
#[utoipa::path(
    put,
    path = "/visits/{id}/comment",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visit ID")),
    request_body = UpsertCommentRequest,
    responses(
        (status = 200, description = "Comment saved", body = VisitComment),
        (status = 404, description = "Visit not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn upsert_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidJson(data): ValidJson<UpsertCommentRequest>,
) -> AppResult<Json<VisitComment>> {
    let visit = state.services.visits.get(id).await?;
    claims.require_self_or_staff(visit.employee_id, &[Role::Security, Role::Hr, Role::Nurse])?;

    let comment = state
        .services
        .visits
        .upsert_comment(
            id,
            data.comment.as_deref().unwrap_or_default(),
            claims.role,
            claims.user_id,
        )
        .await?;
    Ok(Json(comment))
}
