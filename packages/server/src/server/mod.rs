// HTTP surface: router assembly, middleware, and route handlers.

pub mod app;
pub mod error;
pub mod middleware;
pub mod routes;

pub use app::{build_app, AppState};
