//! Retailer application endpoints: submission, review queues, and the
//! approve/reject workflow.

use axum::extract::{Extension, Path};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::common::RetailerId;
use crate::domains::retailers::actions;
use crate::domains::retailers::models::{NewRetailerApplication, RetailerApplication};
use crate::domains::review::queries::{
    self, EntityKind, PendingApplication, ReviewStats, ReviewedApplication,
};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_admin, AuthUser};

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct PendingApplicationsResponse {
    pub applications: Vec<PendingApplication>,
    pub stats: ReviewStats,
}

#[derive(Serialize)]
pub struct ReviewedApplicationsResponse {
    pub applications: Vec<ReviewedApplication>,
}

/// POST /api/retailers/{id}/approve
pub async fn approve_retailer(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<RetailerId>,
    body: Option<Json<ApproveRequest>>,
) -> Result<Json<Value>, ApiError> {
    let admin = require_admin(auth.as_deref())?;
    let notes = body.and_then(|Json(b)| b.notes);
    actions::approve_application(id, admin.user_id, notes, &state.db_pool).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/retailers/{id}/reject
pub async fn reject_retailer(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<RetailerId>,
    body: Option<Json<RejectRequest>>,
) -> Result<Json<Value>, ApiError> {
    let admin = require_admin(auth.as_deref())?;
    let reason = body.and_then(|Json(b)| b.reason);
    actions::reject_application(id, admin.user_id, reason, &state.db_pool).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/retailers - admin-created retailer, born approved.
pub async fn create_retailer(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(data): Json<NewRetailerApplication>,
) -> Result<Json<RetailerApplication>, ApiError> {
    let admin = require_admin(auth.as_deref())?;
    let retailer = actions::create_approved(data, admin.user_id, &state.db_pool).await?;
    Ok(Json(retailer))
}

/// POST /api/retailers/apply - public application submission.
pub async fn submit_retailer_application(
    Extension(state): Extension<AppState>,
    Json(data): Json<NewRetailerApplication>,
) -> Result<Json<RetailerApplication>, ApiError> {
    let application = actions::submit_application(data, &state.db_pool).await?;
    Ok(Json(application))
}

/// DELETE /api/retailers/{id}
pub async fn delete_retailer(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<RetailerId>,
) -> Result<Json<Value>, ApiError> {
    require_admin(auth.as_deref())?;
    actions::delete_application(id, &state.db_pool).await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/retailers/pending - review queue with risk flags and stats.
pub async fn pending_retailers(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<PendingApplicationsResponse>, ApiError> {
    require_admin(auth.as_deref())?;
    let applications = queries::pending_applications(&state.db_pool).await?;
    let stats = queries::compute_stats(EntityKind::Retailer, &state.db_pool).await?;
    Ok(Json(PendingApplicationsResponse { applications, stats }))
}

/// GET /api/retailers/approved
pub async fn approved_retailers(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<ReviewedApplicationsResponse>, ApiError> {
    require_admin(auth.as_deref())?;
    let applications = queries::approved_applications(&state.db_pool).await?;
    Ok(Json(ReviewedApplicationsResponse { applications }))
}

/// GET /api/retailers/rejected
pub async fn rejected_retailers(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<ReviewedApplicationsResponse>, ApiError> {
    require_admin(auth.as_deref())?;
    let applications = queries::rejected_applications(&state.db_pool).await?;
    Ok(Json(ReviewedApplicationsResponse { applications }))
}
