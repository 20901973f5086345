//! Dashboard metrics endpoint.

use axum::extract::Extension;
use axum::Json;

use crate::domains::review::queries::{self, DashboardMetrics};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_admin, AuthUser};

/// GET /api/dashboard/metrics
pub async fn dashboard_metrics(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<DashboardMetrics>, ApiError> {
    require_admin(auth.as_deref())?;
    let metrics = queries::dashboard_metrics(&state.db_pool).await?;
    Ok(Json(metrics))
}
