use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::common::UserId;
use crate::domains::profiles::models::UserProfile;
use crate::domains::review::ApprovalError;
use crate::server::app::AppState;

/// Authenticated caller, attached to the request after token verification.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: String,
    pub is_admin: bool,
}

/// JWT authentication middleware.
///
/// Extracts the bearer token, verifies it, and confirms the caller's role
/// against their `user_profiles` row (the role claim is never trusted from
/// the token). On any failure the request continues without an `AuthUser`;
/// admin enforcement happens in the handlers.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(user) = authenticate(&state, request.headers()).await {
        debug!(user_id = %user.user_id, is_admin = user.is_admin, "Authenticated request");
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }
    next.run(request).await
}

async fn authenticate(state: &AppState, headers: &axum::http::HeaderMap) -> Option<AuthUser> {
    let auth_header = headers.get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Handle both "Bearer <token>" and a raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);
    let claims = state.jwt_service.verify_token(token).ok()?;

    let user_id = UserId::from_uuid(claims.sub);
    let profile = UserProfile::find_by_id(user_id, &state.db_pool)
        .await
        .ok()
        .flatten()?;

    let is_admin = profile.is_admin();
    Some(AuthUser {
        user_id,
        email: profile.email,
        is_admin,
    })
}

/// Gate for admin-only operations: rejects unauthenticated callers and
/// authenticated callers whose profile lacks the admin role.
pub fn require_admin(user: Option<&AuthUser>) -> Result<&AuthUser, ApprovalError> {
    match user {
        Some(user) if user.is_admin => Ok(user),
        _ => Err(ApprovalError::Unauthorized),
    }
}
