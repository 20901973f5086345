// Domain modules: each owns its models (all SQL) and actions.

pub mod categories;
pub mod deals;
pub mod profiles;
pub mod retailers;
pub mod review;
