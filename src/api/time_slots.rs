//! Time slot API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        enums::Role,
        time_slot::{CreateDatePlaceholder, TimeSlot, TimeSlotWithBooking, UpsertTimeSlot},
        user::UserClaims,
    },
};

use super::{AuthenticatedUser, ValidJson};

/// Roles that manage any employee's slots
const SLOT_MANAGERS: &[Role] = &[Role::Hr];

/// Employees edit their own slots; managers edit anyone's
fn check_owner(claims: &UserClaims, employee_id: Option<i32>) -> AppResult<()> {
    match employee_id {
        Some(id) => claims.require_self_or_staff(id, SLOT_MANAGERS),
        None => Ok(()),
    }
}

/// Add a date placeholder for an employee
#[utoipa::path(
    post,
    path = "/timeslots/date",
    tag = "timeslots",
    security(("bearer_auth" = [])),
    request_body = CreateDatePlaceholder,
    responses(
        (status = 201, description = "Placeholder created", body = TimeSlot),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "A slot already exists on that date", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_date_placeholder(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidJson(data): ValidJson<CreateDatePlaceholder>,
) -> AppResult<(StatusCode, Json<TimeSlot>)> {
    check_owner(&claims, data.employee_id)?;
    let slot = state.services.time_slots.create_date_placeholder(&data).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// Create a slot, or update the one named by `slotId`
#[utoipa::path(
    post,
    path = "/timeslots",
    tag = "timeslots",
    security(("bearer_auth" = [])),
    request_body = UpsertTimeSlot,
    responses(
        (status = 201, description = "Slot created", body = TimeSlot),
        (status = 200, description = "Slot updated", body = TimeSlot),
        (status = 409, description = "Duplicate slot", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_or_update_slot(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    ValidJson(data): ValidJson<UpsertTimeSlot>,
) -> AppResult<(StatusCode, Json<TimeSlot>)> {
    check_owner(&claims, data.employee_id)?;
    if let Some(slot_id) = data.slot_id {
        let existing = state.services.time_slots.get(slot_id).await?;
        check_owner(&claims, Some(existing.employee_id))?;
    }

    let status = if data.slot_id.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let slot = state
        .services
        .time_slots
        .create_or_update_slot(data.slot_id, &data)
        .await?;
    Ok((status, Json(slot)))
}

/// Update a slot's date and hours
#[utoipa::path(
    put,
    path = "/timeslots/{id}",
    tag = "timeslots",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Time slot ID")),
    request_body = UpsertTimeSlot,
    responses(
        (status = 200, description = "Slot updated", body = TimeSlot),
        (status = 404, description = "Slot not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate or booked slot", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_slot(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    ValidJson(data): ValidJson<UpsertTimeSlot>,
) -> AppResult<Json<TimeSlot>> {
    let existing = state.services.time_slots.get(id).await?;
    check_owner(&claims, Some(existing.employee_id))?;
    check_owner(&claims, data.employee_id)?;

    let slot = state
        .services
        .time_slots
        .create_or_update_slot(Some(id), &data)
        .await?;
    Ok(Json(slot))
}

/// Delete a slot
#[utoipa::path(
    delete,
    path = "/timeslots/{id}",
    tag = "timeslots",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Time slot ID")),
    responses(
        (status = 204, description = "Slot deleted"),
        (status = 404, description = "Slot not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_slot(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let existing = state.services.time_slots.get(id).await?;
    check_owner(&claims, Some(existing.employee_id))?;
    state.services.time_slots.delete_slot(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every slot of an employee, with booking state
#[utoipa::path(
    get,
    path = "/employees/{id}/timeslots",
    tag = "timeslots",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee slots", body = Vec<TimeSlotWithBooking>)
    )
)]
pub async fn list_employee_slots(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<TimeSlotWithBooking>>> {
    claims.require_self_or_staff(id, &[Role::Hr, Role::Security])?;
    let slots = state.services.time_slots.list_for_employee(id).await?;
    Ok(Json(slots))
}

/// Open slots of an employee, from today on
#[utoipa::path(
    get,
    path = "/employees/{id}/available-timeslots",
    tag = "timeslots",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Available slots", body = Vec<TimeSlot>)
    )
)]
pub async fn list_available_slots(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<TimeSlot>>> {
    let slots = state.services.time_slots.list_available(id).await?;
    Ok(Json(slots))
}
