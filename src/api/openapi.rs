//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{directory, health, high_care, time_slots, visitors, visits};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visitrack API",
        version = "0.3.0",
        description = "Visitor management: visit registration, approval, check-in and high-care clearance"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Directory
        directory::list_employees,
        directory::list_purposes,
        directory::list_valid_id_types,
        directory::me,
        // Time slots
        time_slots::create_date_placeholder,
        time_slots::create_or_update_slot,
        time_slots::update_slot,
        time_slots::delete_slot,
        time_slots::list_employee_slots,
        time_slots::list_available_slots,
        // Visits
        visits::create_visit,
        visits::list_visits,
        visits::get_visit,
        visits::set_approval_status,
        visits::set_check_in_status,
        visits::upsert_comment,
        // Visitors
        visitors::set_visitor_status,
        visitors::set_visitor_approval,
        // High care
        high_care::request_clearance,
        high_care::submit_health_declaration,
        high_care::mark_nurse_approved,
        high_care::list_high_care_visits,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::ApprovalStatus,
            crate::models::enums::CheckInStatus,
            crate::models::enums::Role,
            // Directory
            crate::models::directory::EmployeeListItem,
            crate::models::directory::EmployeeQuery,
            crate::models::directory::VisitPurpose,
            crate::models::directory::ValidIdType,
            crate::models::user::StaffProfile,
            // Time slots
            crate::models::time_slot::TimeSlot,
            crate::models::time_slot::TimeSlotWithBooking,
            crate::models::time_slot::CreateDatePlaceholder,
            crate::models::time_slot::UpsertTimeSlot,
            // Visits
            crate::models::visit::Visit,
            crate::models::visit::VisitDetails,
            crate::models::visit::CreateVisit,
            crate::models::visit::CreateVisitResponse,
            crate::models::visit::SetApprovalRequest,
            crate::models::visit::SetCheckInRequest,
            crate::models::visit::VisitQuery,
            crate::models::visit::VisitComment,
            crate::models::visit::UpsertCommentRequest,
            crate::models::visit::StatusChangeResponse,
            // High care
            crate::models::high_care::HighCareRequest,
            crate::models::high_care::CreateHighCareRequest,
            crate::models::high_care::HighCareRequestResponse,
            crate::models::high_care::DeclarationAnswer,
            crate::models::high_care::SubmitHealthDeclaration,
            crate::models::high_care::SymptomDeclaration,
            crate::models::high_care::ProhibitedItemsDeclaration,
            crate::models::high_care::HealthDeclarationResponse,
            crate::models::high_care::HighCareVisit,
            crate::models::high_care::HighCareVisitQuery,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authenticated staff profile"),
        (name = "directory", description = "Employees and lookup tables"),
        (name = "timeslots", description = "Employee availability"),
        (name = "visits", description = "Visit registration, approval and check-in"),
        (name = "visitors", description = "Visitor-keyed shortcuts on the latest visit"),
        (name = "high-care", description = "Nurse clearance for restricted areas")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_workflow_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/visits",
            "/visits/{id}/approval",
            "/visitors/{id}/status",
            "/timeslots/date",
            "/health/{visit_id}/submit",
            "/nurse/high-care-visits",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
