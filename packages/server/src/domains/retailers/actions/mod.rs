//! Retailer application actions - business logic for the approval workflow.
//!
//! Admin authorization is checked at the HTTP layer; these functions assume
//! the caller is already authorized. Writes go through conditional updates
//! keyed on the observed status so concurrent reviews cannot silently
//! overwrite each other.

use sqlx::PgPool;
use tracing::{info, warn};

use crate::common::validation::{generate_slug, is_valid_slug, is_valid_url, ValidationErrors};
use crate::common::{RetailerId, UserId};
use crate::domains::profiles::models::UserProfile;
use crate::domains::retailers::models::{NewRetailerApplication, RetailerApplication};
use crate::domains::review::{ApprovalError, ReviewStatus};

const DEFAULT_APPROVAL_NOTES: &str = "Approved by admin review";

/// Approve a retailer application.
///
/// Idempotent: approving an already-approved retailer is a no-op success.
pub async fn approve_application(
    id: RetailerId,
    acting_admin: UserId,
    notes: Option<String>,
    pool: &PgPool,
) -> Result<RetailerApplication, ApprovalError> {
    let current = RetailerApplication::find_by_id(id, pool)
        .await?
        .ok_or(ApprovalError::NotFound("retailer"))?;
    let status: ReviewStatus = current.status.parse()?;

    if status == ReviewStatus::Approved {
        info!(retailer_id = %id, "Retailer already approved, nothing to do");
        return Ok(current);
    }
    status.ensure_transition(ReviewStatus::Approved)?;

    let notes = notes.unwrap_or_else(|| DEFAULT_APPROVAL_NOTES.to_string());
    let updated =
        RetailerApplication::mark_approved(id, acting_admin, &notes, &current.status, pool)
            .await?
            .ok_or(ApprovalError::InvalidTransition {
                from: status,
                to: ReviewStatus::Approved,
            })?;

    info!(retailer_id = %id, acting_admin = %acting_admin, "Retailer approved");

    cascade_profile_status(&updated, pool).await;

    // TODO: send approval email to the retailer once the notification service exists

    Ok(updated)
}

/// Reject a retailer application with a reason.
///
/// The reason is validated server-side before the store is touched.
/// Idempotent: re-rejecting keeps the original stored reason.
pub async fn reject_application(
    id: RetailerId,
    acting_admin: UserId,
    reason: Option<String>,
    pool: &PgPool,
) -> Result<RetailerApplication, ApprovalError> {
    let reason = reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApprovalError::invalid_field("reason", "Rejection reason is required"))?;

    let current = RetailerApplication::find_by_id(id, pool)
        .await?
        .ok_or(ApprovalError::NotFound("retailer"))?;
    let status: ReviewStatus = current.status.parse()?;

    if status == ReviewStatus::Rejected {
        info!(retailer_id = %id, "Retailer already rejected, nothing to do");
        return Ok(current);
    }
    status.ensure_transition(ReviewStatus::Rejected)?;

    let updated =
        RetailerApplication::mark_rejected(id, acting_admin, &reason, &current.status, pool)
            .await?
            .ok_or(ApprovalError::InvalidTransition {
                from: status,
                to: ReviewStatus::Rejected,
            })?;

    info!(retailer_id = %id, acting_admin = %acting_admin, "Retailer rejected");

    cascade_profile_status(&updated, pool).await;

    // TODO: send rejection email with the reason once the notification service exists

    Ok(updated)
}

/// Submit a new application from the public site. Starts pending and
/// inactive.
pub async fn submit_application(
    data: NewRetailerApplication,
    pool: &PgPool,
) -> Result<RetailerApplication, ApprovalError> {
    let slug = validated_slug(&data, pool).await?;
    let application = RetailerApplication::submit(&data, &slug, pool).await?;
    info!(retailer_id = %application.id, "Retailer application submitted");
    Ok(application)
}

/// Admin-created retailer: bypasses the pending state entirely.
pub async fn create_approved(
    data: NewRetailerApplication,
    creator_admin: UserId,
    pool: &PgPool,
) -> Result<RetailerApplication, ApprovalError> {
    let slug = validated_slug(&data, pool).await?;
    let retailer = RetailerApplication::create_approved(&data, &slug, creator_admin, pool).await?;
    info!(retailer_id = %retailer.id, creator = %creator_admin, "Retailer created pre-approved");
    Ok(retailer)
}

/// Hard delete, blocked while the retailer still has deals.
pub async fn delete_application(id: RetailerId, pool: &PgPool) -> Result<(), ApprovalError> {
    let retailer = RetailerApplication::find_by_id(id, pool)
        .await?
        .ok_or(ApprovalError::NotFound("retailer"))?;

    if retailer.deal_count > 0 {
        return Err(ApprovalError::invalid_field(
            "deal_count",
            format!(
                "Cannot delete retailer with {} associated deal(s)",
                retailer.deal_count
            ),
        ));
    }

    RetailerApplication::delete(id, pool).await?;
    info!(retailer_id = %id, "Retailer deleted");
    Ok(())
}

/// Mirror the application's status onto the linked account profile.
///
/// Best-effort secondary effect: a failure here is logged and never fails
/// the primary transition, so a window where the profile lags the
/// application is accepted.
async fn cascade_profile_status(application: &RetailerApplication, pool: &PgPool) {
    let Some(user_id) = application.user_id else {
        return;
    };
    if let Err(error) =
        UserProfile::set_retailer_status(user_id, &application.status, pool).await
    {
        warn!(
            retailer_id = %application.id,
            user_id = %user_id,
            error = %error,
            "Profile status cascade failed, review result stands"
        );
    }
}

async fn validated_slug(
    data: &NewRetailerApplication,
    pool: &PgPool,
) -> Result<String, ApprovalError> {
    let mut errors = ValidationErrors::default();

    if data.name.trim().is_empty() {
        errors.add("name", "Retailer name is required");
    }
    if !data.email.contains('@') {
        errors.add("email", "A valid contact email is required");
    }
    if let Some(url) = data.website_url.as_deref() {
        if url != "None provided" && !is_valid_url(url) {
            errors.add("website_url", "Website must be a valid http(s) URL");
        }
    }

    let slug = match &data.slug {
        Some(slug) => slug.clone(),
        None => generate_slug(&data.name),
    };
    if !is_valid_slug(&slug) {
        errors.add(
            "slug",
            "Slug must contain only lowercase letters, numbers, and hyphens",
        );
    } else if RetailerApplication::slug_exists(&slug, pool).await? {
        errors.add("slug", "This slug is already in use");
    }

    if errors.is_empty() {
        Ok(slug)
    } else {
        Err(ApprovalError::ValidationFailed { errors })
    }
}
