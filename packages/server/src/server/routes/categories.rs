//! Category catalog endpoints.

use axum::extract::{Extension, Path};
use axum::Json;
use serde_json::{json, Value};

use crate::common::CategoryId;
use crate::domains::categories::actions;
use crate::domains::categories::models::{Category, NewCategory};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_admin, AuthUser};

/// GET /api/categories
pub async fn list_categories(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    require_admin(auth.as_deref())?;
    let categories = Category::find_all(&state.db_pool).await?;
    Ok(Json(categories))
}

/// POST /api/categories
pub async fn create_category(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(data): Json<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    require_admin(auth.as_deref())?;
    let category = actions::create_category(data, &state.db_pool).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - blocked while deals are filed under it.
pub async fn delete_category(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Value>, ApiError> {
    require_admin(auth.as_deref())?;
    actions::delete_category(id, &state.db_pool).await?;
    Ok(Json(json!({ "success": true })))
}
