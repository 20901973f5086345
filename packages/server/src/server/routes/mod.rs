// HTTP routes
pub mod categories;
pub mod dashboard;
pub mod deals;
pub mod health;
pub mod retailers;

pub use categories::*;
pub use dashboard::*;
pub use deals::*;
pub use health::*;
pub use retailers::*;
