//! Visit lifecycle: registration, approval and check-in

use chrono::{Duration, Local, Timelike};

use super::notifications::NotificationHub;
use crate::{
    config::VisitsConfig,
    error::{AppError, AppResult},
    models::{
        enums::{ApprovalStatus, CheckInStatus, Role},
        visit::{CreateVisit, NewVisit, Visit, VisitComment, VisitDetails, VisitQuery},
        visitor::VisitorIdentity,
    },
    repository::{visits::VisitFilter, Repository},
    workflow::{
        approval::{parse_status_name, parse_visitor_status_name},
        check_in::parse_check_in_status,
        ensure_within_window, plan_approval, plan_check_in,
        slot_time::{format_expected_time, parse_slot_date},
        ApprovalChange, CheckInState, Stamp,
    },
};

fn required<T: Clone>(value: &Option<T>, field: &str) -> AppResult<T> {
    value
        .clone()
        .ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

/// Like `required`, but blank text counts as missing
fn required_text(value: &Option<String>, field: &str) -> AppResult<String> {
    trimmed(value).ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Clone)]
pub struct VisitsService {
    repository: Repository,
    config: VisitsConfig,
    hub: NotificationHub,
}

impl VisitsService {
    pub fn new(repository: Repository, config: VisitsConfig, hub: NotificationHub) -> Self {
        Self {
            repository,
            config,
            hub,
        }
    }

    /// Register a visit on one of the host's open slots.
    ///
    /// The visitor is matched by email and created on first visit. The new
    /// visit starts in Waiting For Approval.
    pub async fn create_visit(&self, data: &CreateVisit) -> AppResult<Visit> {
        let first_name = required_text(&data.first_name, "firstName")?;
        let last_name = required_text(&data.last_name, "lastName")?;
        let email = required_text(&data.email, "email")?;
        let employee_id = required(&data.visited_employee_id, "visitedEmployeeId")?;
        let purpose_id = required(&data.visit_purpose_id, "visitPurposeId")?;
        let slot_id = required(&data.selected_time_slot, "selectedTimeSlot")?;

        if !self.repository.staff.employee_exists(employee_id).await? {
            return Err(AppError::InvalidReference(format!(
                "Employee {} does not exist",
                employee_id
            )));
        }
        if !self.repository.lookups.purpose_exists(purpose_id).await? {
            return Err(AppError::InvalidReference(format!(
                "Visit purpose {} does not exist",
                purpose_id
            )));
        }

        let slot = match self.repository.time_slots.get_by_id(slot_id).await {
            Ok(slot) => slot,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::InvalidReference(format!(
                    "Time slot {} does not exist",
                    slot_id
                )))
            }
            Err(e) => return Err(e),
        };
        if slot.employee_id != employee_id {
            return Err(AppError::InvalidReference(format!(
                "Time slot {} does not belong to employee {}",
                slot_id, employee_id
            )));
        }
        if slot.slot_date < Local::now().date_naive() {
            return Err(AppError::Conflict(format!(
                "Time slot {} is in the past",
                slot_id
            )));
        }
        if self.repository.time_slots.is_booked(slot_id).await? {
            return Err(AppError::Conflict("Time slot is already booked".to_string()));
        }

        let visitor = self
            .repository
            .visitors
            .find_or_create(&VisitorIdentity {
                first_name,
                last_name,
                email,
                contact_number: trimmed(&data.contact_number),
                address: trimmed(&data.address),
            })
            .await?;

        let waiting_id = self
            .repository
            .lookups
            .approval_status_id(ApprovalStatus::WaitingForApproval)
            .await?;

        let visit = self
            .repository
            .visits
            .create(
                &NewVisit {
                    visitor_id: visitor.id,
                    employee_id,
                    purpose_id,
                    visit_date: slot.slot_date,
                    time_slot_id: slot.id,
                    expected_time: format_expected_time(&slot.start_time, &slot.end_time),
                    device_type: trimmed(&data.device_type),
                    device_brand: trimmed(&data.device_brand),
                },
                waiting_id,
            )
            .await?;

        tracing::info!(
            visit_id = visit.id,
            visitor_id = visitor.id,
            employee_id,
            slot_id,
            "Visit registered"
        );
        self.hub.notify_update(format!(
            "New visit request from {} {}",
            visitor.first_name, visitor.last_name
        ));
        Ok(visit)
    }

    /// Validate and persist an approval change on a loaded visit
    pub(crate) async fn apply_approval(&self, visit: Visit, to: ApprovalStatus) -> AppResult<Visit> {
        let from = visit.approval_status;
        let (to, release_slot) = match plan_approval(from, to, visit.check_in_status)? {
            ApprovalChange::Unchanged => return Ok(visit),
            ApprovalChange::Apply { to, release_slot } => (to, release_slot),
        };

        let to_id = self.repository.lookups.approval_status_id(to).await?;
        let updated = self
            .repository
            .visits
            .set_approval(visit.id, from, to_id, release_slot)
            .await?;

        tracing::info!(
            visit_id = visit.id,
            from = %from,
            to = %to,
            slot_released = release_slot,
            "Approval status changed"
        );
        self.hub.notify_update(format!("Visit {} is now {}", visit.id, to));
        Ok(updated)
    }

    pub async fn set_approval_status(&self, visit_id: i32, status_name: &str) -> AppResult<Visit> {
        let to = parse_status_name(status_name)?;
        let visit = self.repository.visits.get_by_id(visit_id).await?;
        self.apply_approval(visit, to).await
    }

    /// Approval change on the visitor's most recent visit
    pub async fn set_approval_for_visitor(&self, visitor_id: i32, status_name: &str) -> AppResult<Visit> {
        let to = parse_visitor_status_name(status_name)?;
        self.repository.visitors.get_by_id(visitor_id).await?;
        let visit = self.repository.visits.latest_for_visitor(visitor_id).await?;
        self.apply_approval(visit, to).await
    }

    pub async fn set_check_in_status(
        &self,
        visit_id: i32,
        status_name: &str,
        valid_id_type_id: Option<i32>,
    ) -> AppResult<Visit> {
        let next = parse_check_in_status(status_name)?;
        let visit = self.repository.visits.get_by_id(visit_id).await?;
        self.apply_check_in(visit, next, valid_id_type_id).await
    }

    /// Check-in change on the visitor's most recent visit
    pub async fn set_check_in_for_visitor(
        &self,
        visitor_id: i32,
        status_name: &str,
        valid_id_type_id: Option<i32>,
    ) -> AppResult<Visit> {
        let next = parse_check_in_status(status_name)?;
        self.repository.visitors.get_by_id(visitor_id).await?;
        let visit = self.repository.visits.latest_for_visitor(visitor_id).await?;
        self.apply_check_in(visit, next, valid_id_type_id).await
    }

    async fn apply_check_in(
        &self,
        visit: Visit,
        next: CheckInStatus,
        valid_id_type_id: Option<i32>,
    ) -> AppResult<Visit> {
        if let Some(id_type) = valid_id_type_id {
            if !self.repository.lookups.valid_id_type_exists(id_type).await? {
                return Err(AppError::InvalidReference(format!(
                    "Valid ID type {} does not exist",
                    id_type
                )));
            }
        }

        let change = plan_check_in(
            &CheckInState {
                approval: visit.approval_status,
                status: visit.check_in_status,
                time_in: visit.time_in,
                time_out: visit.time_out,
            },
            next,
        )?;

        let now = Local::now().naive_local();
        if change.stamp == Stamp::TimeIn && self.config.enforce_check_in_window {
            let (start, end) = match visit.time_slot_id {
                Some(slot_id) => {
                    let slot = self.repository.time_slots.get_by_id(slot_id).await?;
                    (slot.start_time, slot.end_time)
                }
                None => (String::new(), String::new()),
            };
            ensure_within_window(
                visit.visit_date,
                &start,
                &end,
                now,
                Duration::minutes(self.config.check_in_grace_minutes),
            )?;
        }

        let at = now.time().with_nanosecond(0).unwrap_or_else(|| now.time());
        let updated = self
            .repository
            .visits
            .set_check_in(visit.id, visit.check_in_status, &change, at, valid_id_type_id)
            .await?;

        tracing::info!(
            visit_id = visit.id,
            from = visit.check_in_status.map(|s| s.as_str()).unwrap_or("none"),
            to = %change.status,
            slot_released = change.release_slot,
            "Check-in status changed"
        );
        self.hub
            .notify_update(format!("Visit {} is now {}", visit.id, change.status));
        Ok(updated)
    }

    pub async fn get(&self, visit_id: i32) -> AppResult<VisitDetails> {
        self.repository.visits.get_details(visit_id).await
    }

    /// List visits. `host` restricts the listing to one employee's visits and
    /// takes precedence over the query's employee filter.
    pub async fn list(&self, query: &VisitQuery, host: Option<i32>) -> AppResult<Vec<VisitDetails>> {
        let date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => Some(parse_slot_date(raw)?),
            None => None,
        };
        let approval_status = match query
            .approval_status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(raw) => Some(parse_status_name(raw)?),
            None => None,
        };

        self.repository
            .visits
            .list(&VisitFilter {
                date,
                employee_id: host.or(query.employee_id),
                approval_status,
            })
            .await
    }

    pub async fn upsert_comment(
        &self,
        visit_id: i32,
        body: &str,
        author_role: Role,
        author_id: i32,
    ) -> AppResult<VisitComment> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::Validation("comment is required".to_string()));
        }
        let comment = self
            .repository
            .visits
            .upsert_comment(visit_id, body, author_role, author_id)
            .await?;

        tracing::info!(visit_id, comment_id = comment.id, author = %author_role, "Visit comment saved");
        self.hub.notify_update("Comment saved");
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_blank() {
        assert_eq!(required_text(&Some("  Ana ".to_string()), "firstName").unwrap(), "Ana");
        assert!(matches!(
            required_text(&Some("   ".to_string()), "firstName"),
            Err(AppError::Validation(msg)) if msg.contains("firstName")
        ));
        assert!(matches!(required_text(&None, "lastName"), Err(AppError::Validation(_))));
    }
}
