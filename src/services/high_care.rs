//! High-care sub-workflow: clearance, health declaration, nurse approval
//!
//! Each step is its own operation and can be retried on its own. A request
//! without declarations is a valid intermediate state.

use chrono::Local;

use super::{notifications::NotificationHub, visits::VisitsService};
use crate::{
    config::VisitsConfig,
    error::{AppError, AppResult},
    models::{
        enums::ApprovalStatus,
        high_care::{
            CreateHighCareRequest, HealthDeclarationResponse, HighCareRequest, HighCareVisit,
            HighCareVisitQuery, SubmitHealthDeclaration,
        },
        visit::Visit,
    },
    repository::Repository,
    workflow::{
        high_care::{build_request, check_declaration_size},
        slot_time::parse_slot_date,
    },
};

#[derive(Clone)]
pub struct HighCareService {
    repository: Repository,
    config: VisitsConfig,
    visits: VisitsService,
    hub: NotificationHub,
}

impl HighCareService {
    pub fn new(
        repository: Repository,
        config: VisitsConfig,
        visits: VisitsService,
        hub: NotificationHub,
    ) -> Self {
        Self {
            repository,
            config,
            visits,
            hub,
        }
    }

    async fn ensure_nurse(&self, nurse_id: i32) -> AppResult<()> {
        if !self.repository.staff.nurse_exists(nurse_id).await? {
            return Err(AppError::InvalidReference(format!(
                "Nurse {} does not exist",
                nurse_id
            )));
        }
        Ok(())
    }

    /// Issue a clearance for a visit. Clearances are approved on creation.
    pub async fn request_clearance(
        &self,
        visit_id: i32,
        nurse_id: i32,
        data: &CreateHighCareRequest,
    ) -> AppResult<HighCareRequest> {
        let visit = self.repository.visits.get_by_id(visit_id).await?;
        let new_request = build_request(visit.id, visit.approval_status, nurse_id, data)?;
        self.ensure_nurse(nurse_id).await?;

        let request = self.repository.high_care.create_request(&new_request).await?;

        tracing::info!(
            visit_id,
            request_id = request.id,
            nurse_id,
            permission_type = %request.permission_type,
            "High-care clearance issued"
        );
        self.hub
            .notify_update(format!("High-care clearance issued for visit {}", visit_id));
        Ok(request)
    }

    /// Record the symptom questionnaire and prohibited-items checklist against
    /// the visit's latest clearance. Only one submission per clearance.
    pub async fn submit_health_declaration(
        &self,
        visit_id: i32,
        nurse_id: i32,
        data: &SubmitHealthDeclaration,
    ) -> AppResult<HealthDeclarationResponse> {
        check_declaration_size(data, self.config.max_declaration_answers)?;
        self.repository.visits.get_by_id(visit_id).await?;

        let request = self
            .repository
            .high_care
            .latest_request(visit_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No high-care request found for visit {}", visit_id))
            })?;

        if self.repository.high_care.has_declaration(request.id).await? {
            return Err(AppError::Conflict(
                "Health declaration already submitted for this visit".to_string(),
            ));
        }
        self.ensure_nurse(nurse_id).await?;

        let (symptoms, prohibited_items) = self
            .repository
            .high_care
            .insert_declarations(request.id, nurse_id, &data.symptoms, &data.prohibited_items)
            .await?;

        tracing::info!(visit_id, request_id = request.id, nurse_id, "Health declaration submitted");
        self.hub.notify_update("Health declaration submitted");
        Ok(HealthDeclarationResponse {
            request_id: request.id,
            symptoms,
            prohibited_items,
            message: "Health declaration submitted".to_string(),
        })
    }

    /// Move a partially approved visit to Nurse Approved
    pub async fn mark_nurse_approved(&self, visit_id: i32) -> AppResult<Visit> {
        let visit = self.repository.visits.get_by_id(visit_id).await?;
        self.visits
            .apply_approval(visit, ApprovalStatus::NurseApproved)
            .await
    }

    /// Clinic worklist for one day, defaulting to today
    pub async fn list_high_care_visits(&self, query: &HighCareVisitQuery) -> AppResult<Vec<HighCareVisit>> {
        let date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_slot_date(raw)?,
            None => Local::now().date_naive(),
        };
        self.repository
            .high_care
            .list_visits(date, query.employee_id)
            .await
    }
}
