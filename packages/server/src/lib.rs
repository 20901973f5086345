// Dealstack Admin - Review API Core
//
// Backend service for the deals marketplace admin panel: retailer
// applications and submitted deals flow through a pending -> approved/rejected
// review workflow, with heuristic risk flags computed for reviewers.
//
// Domains own their models (all SQL lives in models/) and actions; the axum
// surface lives in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
