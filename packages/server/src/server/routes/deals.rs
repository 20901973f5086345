//! Deal endpoints: submission, flagged-inventory queue, and the
//! approve/reject workflow.

use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::common::DealId;
use crate::domains::deals::actions;
use crate::domains::deals::models::{Deal, NewDeal};
use crate::domains::review::queries::{self, ClearedItem, EntityKind, FlaggedItem, ReviewStats};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_admin, AuthUser};

use super::retailers::{ApproveRequest, RejectRequest};

const DEFAULT_CLEARED_WINDOW_HOURS: i64 = 24;
const DEFAULT_CLEARED_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct ClearedQuery {
    pub window_hours: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct FlaggedInventoryResponse {
    pub items: Vec<FlaggedItem>,
    pub stats: ReviewStats,
}

#[derive(Serialize)]
pub struct RecentlyClearedResponse {
    pub items: Vec<ClearedItem>,
}

/// POST /api/deals/{id}/approve
///
/// Notes are accepted for parity with the retailer endpoint but not stored.
pub async fn approve_deal(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<DealId>,
    _body: Option<Json<ApproveRequest>>,
) -> Result<Json<Value>, ApiError> {
    let admin = require_admin(auth.as_deref())?;
    actions::approve_deal(id, admin.user_id, &state.db_pool).await?;
    Ok(Json(json!({ "success": true, "message": "Deal approved successfully" })))
}

/// POST /api/deals/{id}/reject
pub async fn reject_deal(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<DealId>,
    body: Option<Json<RejectRequest>>,
) -> Result<Json<Value>, ApiError> {
    let admin = require_admin(auth.as_deref())?;
    let reason = body.and_then(|Json(b)| b.reason);
    actions::reject_deal(id, admin.user_id, reason, &state.db_pool).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/deals - admin-created deal, born approved.
pub async fn create_deal(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(data): Json<NewDeal>,
) -> Result<Json<Deal>, ApiError> {
    let admin = require_admin(auth.as_deref())?;
    let deal =
        actions::create_approved(data, admin.user_id, &admin.email, &state.db_pool).await?;
    Ok(Json(deal))
}

/// POST /api/deals/submit - retailer deal submission, starts pending.
pub async fn submit_deal(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(data): Json<NewDeal>,
) -> Result<Json<Deal>, ApiError> {
    let submitted_by = auth
        .as_deref()
        .map(|user| user.email.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let deal = actions::submit_deal(data, &submitted_by, &state.db_pool).await?;
    Ok(Json(deal))
}

/// GET /api/deals/flagged - pending deals with risk assessments and stats.
pub async fn flagged_deals(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<FlaggedInventoryResponse>, ApiError> {
    require_admin(auth.as_deref())?;
    let items = queries::flagged_inventory(&state.db_pool).await?;
    let stats = queries::compute_stats(EntityKind::Deal, &state.db_pool).await?;
    Ok(Json(FlaggedInventoryResponse { items, stats }))
}

/// GET /api/deals/cleared - deals approved within the trailing window.
pub async fn recently_cleared_deals(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Query(params): Query<ClearedQuery>,
) -> Result<Json<RecentlyClearedResponse>, ApiError> {
    require_admin(auth.as_deref())?;
    let window_hours = params.window_hours.unwrap_or(DEFAULT_CLEARED_WINDOW_HOURS);
    let limit = params.limit.unwrap_or(DEFAULT_CLEARED_LIMIT);
    let items = queries::recently_cleared(window_hours, limit, &state.db_pool).await?;
    Ok(Json(RecentlyClearedResponse { items }))
}
