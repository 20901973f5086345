//! Deal actions - submission, admin creation, and the approval workflow.
//!
//! A deal with price >= original_price is invalid input, rejected here at
//! validation time; the state machine never sees it.

use sqlx::PgPool;
use tracing::info;

use crate::common::validation::{
    generate_slug, is_future_date, is_valid_slug, is_valid_url, savings_percentage,
    ValidationErrors,
};
use crate::common::{DealId, UserId};
use crate::domains::categories::models::Category;
use crate::domains::deals::models::{Deal, NewDeal};
use crate::domains::retailers::models::RetailerApplication;
use crate::domains::review::{ApprovalError, ReviewStatus};

const MAX_PRODUCT_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 1000;

/// Approve a submitted deal. Idempotent on already-approved deals.
pub async fn approve_deal(
    id: DealId,
    acting_admin: UserId,
    pool: &PgPool,
) -> Result<Deal, ApprovalError> {
    let current = Deal::find_by_id(id, pool)
        .await?
        .ok_or(ApprovalError::NotFound("deal"))?;
    let status: ReviewStatus = current.status.parse()?;

    if status == ReviewStatus::Approved {
        info!(deal_id = %id, "Deal already approved, nothing to do");
        return Ok(current);
    }
    status.ensure_transition(ReviewStatus::Approved)?;

    let updated = Deal::mark_approved(id, acting_admin, &current.status, pool)
        .await?
        .ok_or(ApprovalError::InvalidTransition {
            from: status,
            to: ReviewStatus::Approved,
        })?;

    info!(deal_id = %id, acting_admin = %acting_admin, "Deal approved");
    Ok(updated)
}

/// Reject a submitted deal with a reason. Idempotent on already-rejected
/// deals; the original stored reason is kept.
pub async fn reject_deal(
    id: DealId,
    acting_admin: UserId,
    reason: Option<String>,
    pool: &PgPool,
) -> Result<Deal, ApprovalError> {
    let reason = reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApprovalError::invalid_field("reason", "Rejection reason is required"))?;

    let current = Deal::find_by_id(id, pool)
        .await?
        .ok_or(ApprovalError::NotFound("deal"))?;
    let status: ReviewStatus = current.status.parse()?;

    if status == ReviewStatus::Rejected {
        info!(deal_id = %id, "Deal already rejected, nothing to do");
        return Ok(current);
    }
    status.ensure_transition(ReviewStatus::Rejected)?;

    let updated = Deal::mark_rejected(id, acting_admin, &reason, &current.status, pool)
        .await?
        .ok_or(ApprovalError::InvalidTransition {
            from: status,
            to: ReviewStatus::Rejected,
        })?;

    info!(deal_id = %id, acting_admin = %acting_admin, "Deal rejected");
    Ok(updated)
}

/// Retailer-submitted deal: starts pending and inactive.
pub async fn submit_deal(
    data: NewDeal,
    submitted_by: &str,
    pool: &PgPool,
) -> Result<Deal, ApprovalError> {
    let slug = validate_deal(&data, pool).await?;
    let savings = savings_percentage(data.original_price, data.price);
    let deal = Deal::submit(&data, &slug, savings, submitted_by, pool).await?;
    bump_catalog_counts(&deal, pool).await?;
    info!(deal_id = %deal.id, "Deal submitted for review");
    Ok(deal)
}

/// Admin-created deal: born approved and active.
pub async fn create_approved(
    data: NewDeal,
    creator_admin: UserId,
    creator_email: &str,
    pool: &PgPool,
) -> Result<Deal, ApprovalError> {
    let slug = validate_deal(&data, pool).await?;
    let savings = savings_percentage(data.original_price, data.price);
    let deal =
        Deal::create_approved(&data, &slug, savings, creator_admin, creator_email, pool).await?;
    bump_catalog_counts(&deal, pool).await?;
    info!(deal_id = %deal.id, creator = %creator_admin, "Deal created pre-approved");
    Ok(deal)
}

async fn bump_catalog_counts(deal: &Deal, pool: &PgPool) -> Result<(), ApprovalError> {
    Category::increment_deal_count(&deal.category, pool).await?;
    RetailerApplication::increment_deal_count(&deal.retailer, pool).await?;
    Ok(())
}

/// Full field validation for a new deal; returns the resolved slug.
async fn validate_deal(data: &NewDeal, pool: &PgPool) -> Result<String, ApprovalError> {
    let mut errors = ValidationErrors::default();

    if data.product_name.trim().is_empty() {
        errors.add("product_name", "Product name is required");
    } else if data.product_name.len() > MAX_PRODUCT_NAME_LEN {
        errors.add("product_name", "Product name must be 200 characters or less");
    }

    if data.description.trim().is_empty() {
        errors.add("description", "Description is required");
    } else if data.description.len() > MAX_DESCRIPTION_LEN {
        errors.add("description", "Description must be 1000 characters or less");
    }

    if !is_valid_url(&data.deal_url) {
        errors.add("deal_url", "Deal URL must be a valid http(s) URL");
    }
    if let Some(image_url) = data.image_url.as_deref() {
        if !is_valid_url(image_url) {
            errors.add("image_url", "Image URL must be a valid http(s) URL");
        }
    }

    if data.category.trim().is_empty() {
        errors.add("category", "Category is required");
    }
    if data.retailer.trim().is_empty() {
        errors.add("retailer", "Retailer is required");
    }

    if data.price <= 0 {
        errors.add("price", "Price must be a positive number");
    }
    if data.original_price <= 0 {
        errors.add("original_price", "Original price must be a positive number");
    }
    if data.price > 0 && data.original_price > 0 && data.price >= data.original_price {
        errors.add("price", "Sale price must be less than original price");
    }

    if !is_future_date(data.expiration_date, chrono::Utc::now()) {
        errors.add("expiration_date", "Expiration date must be in the future");
    }

    let slug = match &data.slug {
        Some(slug) => slug.clone(),
        None => generate_slug(&data.product_name),
    };
    if !is_valid_slug(&slug) {
        errors.add(
            "slug",
            "Slug must contain only lowercase letters, numbers, and hyphens",
        );
    } else if Deal::slug_exists(&slug, pool).await? {
        errors.add("slug", "This slug is already in use");
    }

    if errors.is_empty() {
        Ok(slug)
    } else {
        Err(ApprovalError::ValidationFailed { errors })
    }
}
