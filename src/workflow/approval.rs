//! Approval axis transition table

use crate::{
    error::{AppError, AppResult},
    models::enums::{ApprovalStatus, CheckInStatus},
};

/// Statuses accepted by the visitor-keyed approval endpoint
pub const VISITOR_APPROVAL_STATUSES: [ApprovalStatus; 4] = [
    ApprovalStatus::Approved,
    ApprovalStatus::PartialApproved,
    ApprovalStatus::Blocked,
    ApprovalStatus::Cancelled,
];

/// Outcome of validating an approval change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalChange {
    /// Target equals the current status; nothing to write
    Unchanged,
    Apply {
        to: ApprovalStatus,
        /// Unbind the visit's time slot in the same update
        release_slot: bool,
    },
}

/// Statuses reachable from `from` in one step
pub fn allowed_targets(from: ApprovalStatus) -> &'static [ApprovalStatus] {
    use ApprovalStatus::*;
    match from {
        WaitingForApproval => &[Approved, PartialApproved, Blocked, Cancelled],
        Approved => &[Blocked, Cancelled],
        PartialApproved => &[NurseApproved, Blocked, Cancelled],
        NurseApproved => &[],
        Blocked | Cancelled => &[],
    }
}

/// Validate moving a visit from `from` to `to`.
///
/// A finished visit (checked out) no longer changes approval.
pub fn plan_approval(
    from: ApprovalStatus,
    to: ApprovalStatus,
    check_in: Option<CheckInStatus>,
) -> AppResult<ApprovalChange> {
    if from == to {
        return Ok(ApprovalChange::Unchanged);
    }
    if check_in == Some(CheckInStatus::CheckedOut) {
        return Err(AppError::InvalidTransition(
            "Visit is already checked out".to_string(),
        ));
    }
    if !allowed_targets(from).contains(&to) {
        return Err(AppError::InvalidTransition(format!(
            "Cannot change approval from '{}' to '{}'",
            from, to
        )));
    }
    Ok(ApprovalChange::Apply {
        to,
        release_slot: to.releases_slot(),
    })
}

/// Parse a status name coming from a client
pub fn parse_status_name(name: &str) -> AppResult<ApprovalStatus> {
    name.parse::<ApprovalStatus>().map_err(AppError::InvalidStatus)
}

/// Parse a status name for the visitor-keyed endpoint, which only accepts a
/// fixed subset of statuses
pub fn parse_visitor_status_name(name: &str) -> AppResult<ApprovalStatus> {
    let status = parse_status_name(name)?;
    if VISITOR_APPROVAL_STATUSES.contains(&status) {
        Ok(status)
    } else {
        Err(AppError::InvalidStatus(format!(
            "Status '{}' cannot be set from this endpoint",
            status
        )))
    }
}
