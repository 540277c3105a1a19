//! Storage-free visit workflow rules
//!
//! Everything here is pure: callers load the current state, ask these
//! functions what the next state is, then persist it.

pub mod approval;
pub mod check_in;
pub mod high_care;
pub mod slot_time;

pub use approval::{plan_approval, ApprovalChange};
pub use check_in::{ensure_within_window, plan_check_in, CheckInChange, CheckInState, Stamp};
