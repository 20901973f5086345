//! Category catalog actions.

use sqlx::PgPool;
use tracing::info;

use crate::common::validation::{generate_slug, is_valid_slug, ValidationErrors};
use crate::common::CategoryId;
use crate::domains::categories::models::{Category, NewCategory};
use crate::domains::review::ApprovalError;

pub async fn create_category(
    data: NewCategory,
    pool: &PgPool,
) -> Result<Category, ApprovalError> {
    let mut errors = ValidationErrors::default();

    if data.name.trim().is_empty() {
        errors.add("name", "Category name is required");
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
    } else if Category::slug_exists(&slug, pool).await? {
        errors.add("slug", "This slug is already in use");
    }

    if !errors.is_empty() {
        return Err(ApprovalError::ValidationFailed { errors });
    }

    let category = Category::create(&data, &slug, pool).await?;
    info!(category_id = %category.id, slug = %category.slug, "Category created");
    Ok(category)
}

/// Hard delete, blocked while deals are still filed under the category.
pub async fn delete_category(id: CategoryId, pool: &PgPool) -> Result<(), ApprovalError> {
    let category = Category::find_by_id(id, pool)
        .await?
        .ok_or(ApprovalError::NotFound("category"))?;

    if category.deal_count > 0 {
        return Err(ApprovalError::invalid_field(
            "deal_count",
            format!(
                "Cannot delete category with {} associated deal(s)",
                category.deal_count
            ),
        ));
    }

    Category::delete(id, pool).await?;
    info!(category_id = %id, "Category deleted");
    Ok(())
}
