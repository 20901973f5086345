//! The review subsystem: lifecycle states and transitions, risk heuristics,
//! and the read-side queries behind the admin screens.

pub mod queries;
pub mod risk;
pub mod status;

pub use status::{ApprovalError, ReviewStatus};
