//! Check-in axis: forward-only progression and the expected-window guard

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::slot_time::stored_time;
use crate::{
    error::{AppError, AppResult},
    models::enums::{ApprovalStatus, CheckInStatus},
};

/// Which clock column a check-in change stamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    /// Set time-in unless already recorded
    TimeIn,
    TimeOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInChange {
    pub status: CheckInStatus,
    pub stamp: Stamp,
    /// Unbind the time slot (check-out)
    pub release_slot: bool,
}

/// Current position of a visit on the check-in axis
#[derive(Debug, Clone, Copy)]
pub struct CheckInState {
    pub approval: ApprovalStatus,
    pub status: Option<CheckInStatus>,
    pub time_in: Option<NaiveTime>,
    pub time_out: Option<NaiveTime>,
}

/// Parse the status sent by a client; only the three check-in names are valid
pub fn parse_check_in_status(name: &str) -> AppResult<CheckInStatus> {
    name.parse::<CheckInStatus>().map_err(|_| {
        AppError::Validation(format!(
            "Invalid status '{}': expected 'checked in', 'ongoing' or 'checked out'",
            name.trim()
        ))
    })
}

/// Validate advancing a visit to `next`. Progression is strictly forward and
/// Checked Out is terminal.
pub fn plan_check_in(state: &CheckInState, next: CheckInStatus) -> AppResult<CheckInChange> {
    if state.status == Some(CheckInStatus::CheckedOut) || state.time_out.is_some() {
        return Err(AppError::InvalidTransition(
            "Visit is already checked out".to_string(),
        ));
    }

    let current_rank = state.status.map(|s| s.rank()).unwrap_or(0);
    if next.rank() <= current_rank {
        let current = state.status.map(|s| s.as_str()).unwrap_or("not checked in");
        return Err(AppError::InvalidTransition(format!(
            "Cannot move check-in status from '{}' to '{}'",
            current, next
        )));
    }

    if next.records_time_in() {
        if !state.approval.admits_check_in() {
            return Err(AppError::InvalidTransition(format!(
                "Visit is '{}'; it must be Approved or Nurse Approved before check-in",
                state.approval
            )));
        }
        Ok(CheckInChange {
            status: next,
            stamp: Stamp::TimeIn,
            release_slot: false,
        })
    } else {
        if state.status.is_none() {
            return Err(AppError::InvalidTransition(
                "Visit has not been checked in".to_string(),
            ));
        }
        Ok(CheckInChange {
            status: next,
            stamp: Stamp::TimeOut,
            release_slot: true,
        })
    }
}

/// Reject a check-in attempted outside the visit's expected window.
///
/// `start`/`end` are the stored slot times; when the slot has no hours only
/// the date is checked. `grace` widens the window on both sides.
pub fn ensure_within_window(
    visit_date: NaiveDate,
    start: &str,
    end: &str,
    now: NaiveDateTime,
    grace: Duration,
) -> AppResult<()> {
    if now.date() != visit_date {
        return Err(AppError::Validation(format!(
            "Visit is scheduled for {}, not today",
            visit_date
        )));
    }

    let (Some(start), Some(end)) = (stored_time(start), stored_time(end)) else {
        return Ok(());
    };

    let opens = visit_date.and_time(start) - grace;
    let closes = visit_date.and_time(end) + grace;
    if now < opens || now > closes {
        return Err(AppError::Validation(format!(
            "Check-in is only allowed between {} and {}",
            opens.format("%H:%M"),
            closes.format("%H:%M")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(approval: ApprovalStatus, status: Option<CheckInStatus>) -> CheckInState {
        CheckInState {
            approval,
            status,
            time_in: None,
            time_out: None,
        }
    }

    #[test]
    fn test_forward_progression() {
        let s = state(ApprovalStatus::Approved, None);
        let change = plan_check_in(&s, CheckInStatus::CheckedIn).unwrap();
        assert_eq!(change.stamp, Stamp::TimeIn);
        assert!(!change.release_slot);

        let s = state(ApprovalStatus::Approved, Some(CheckInStatus::CheckedIn));
        assert!(plan_check_in(&s, CheckInStatus::Ongoing).is_ok());

        let s = state(ApprovalStatus::NurseApproved, Some(CheckInStatus::Ongoing));
        let change = plan_check_in(&s, CheckInStatus::CheckedOut).unwrap();
        assert_eq!(change.stamp, Stamp::TimeOut);
        assert!(change.release_slot);
    }

    #[test]
    fn test_checked_out_is_terminal() {
        let s = state(ApprovalStatus::Approved, Some(CheckInStatus::CheckedOut));
        for next in CheckInStatus::ALL {
            let err = plan_check_in(&s, next).unwrap_err();
            assert!(matches!(err, AppError::InvalidTransition(_)));
        }
    }

    #[test]
    fn test_recorded_time_out_blocks_check_in() {
        let mut s = state(ApprovalStatus::Approved, Some(CheckInStatus::Ongoing));
        s.time_in = NaiveTime::from_hms_opt(9, 0, 0);
        s.time_out = s.time_in;
        assert!(plan_check_in(&s, CheckInStatus::CheckedOut).is_err());
    }

    #[test]
    fn test_no_regression() {
        let s = state(ApprovalStatus::Approved, Some(CheckInStatus::Ongoing));
        assert!(plan_check_in(&s, CheckInStatus::CheckedIn).is_err());
        assert!(plan_check_in(&s, CheckInStatus::Ongoing).is_err());
    }

    #[test]
    fn test_check_in_requires_admission() {
        for approval in [
            ApprovalStatus::WaitingForApproval,
            ApprovalStatus::PartialApproved,
            ApprovalStatus::Blocked,
            ApprovalStatus::Cancelled,
        ] {
            let s = state(approval, None);
            assert!(plan_check_in(&s, CheckInStatus::CheckedIn).is_err());
        }
    }

    #[test]
    fn test_check_out_requires_check_in() {
        let s = state(ApprovalStatus::Approved, None);
        assert!(plan_check_in(&s, CheckInStatus::CheckedOut).is_err());
    }

    #[test]
    fn test_unknown_status_is_validation_error() {
        assert!(matches!(
            parse_check_in_status("arrived"),
            Err(AppError::Validation(_))
        ));
        assert_eq!(parse_check_in_status("ongoing").unwrap(), CheckInStatus::Ongoing);
    }

    #[test]
    fn test_time_window() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let at = |h, m| date.and_hms_opt(h, m, 0).unwrap();
        let grace = Duration::minutes(15);

        assert!(ensure_within_window(date, "08:00", "10:00", at(9, 0), grace).is_ok());
        assert!(ensure_within_window(date, "08:00", "10:00", at(7, 50), grace).is_ok());
        assert!(ensure_within_window(date, "08:00", "10:00", at(7, 30), grace).is_err());
        assert!(ensure_within_window(date, "08:00", "10:00", at(10, 16), grace).is_err());

        let next_day = date.succ_opt().unwrap().and_hms_opt(9, 0, 0).unwrap();
        assert!(ensure_within_window(date, "08:00", "10:00", next_day, grace).is_err());
    }

    #[test]
    fn test_placeholder_slot_only_checks_date() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let late = date.and_hms_opt(22, 0, 0).unwrap();
        assert!(ensure_within_window(date, "", "", late, Duration::zero()).is_ok());
    }
}
