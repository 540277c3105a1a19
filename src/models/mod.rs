//! Data models for Visitrack

pub mod directory;
pub mod enums;
pub mod high_care;
pub mod time_slot;
pub mod user;
pub mod visit;
pub mod visitor;

// Re-export commonly used types
pub use enums::{ApprovalStatus, CheckInStatus, Role};
pub use high_care::{HighCareRequest, HighCareVisit};
pub use time_slot::{TimeSlot, TimeSlotWithBooking};
pub use user::UserClaims;
pub use visit::{Visit, VisitDetails};
pub use visitor::Visitor;
