//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly. All slugs and emails carry
//! a random suffix because the test database is shared across tests.

use anyhow::Result;
use chrono::{Duration, Utc};
use server_core::common::UserId;
use server_core::domains::categories::models::{Category, NewCategory};
use server_core::domains::deals::models::{Deal, NewDeal};
use server_core::domains::profiles::models::UserProfile;
use server_core::domains::retailers::models::{NewRetailerApplication, RetailerApplication};
use sqlx::PgPool;
use uuid::Uuid;

fn suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Create an admin profile and return its id.
pub async fn create_admin_profile(pool: &PgPool) -> Result<UserId> {
    let id = UserId::new();
    let email = format!("admin-{}@dealstack.test", suffix());
    UserProfile::upsert(id, &email, Some("Test Admin"), "admin", pool).await?;
    Ok(id)
}

/// Create a non-admin profile and return its id.
pub async fn create_user_profile(pool: &PgPool) -> Result<UserId> {
    let id = UserId::new();
    let email = format!("user-{}@dealstack.test", suffix());
    UserProfile::upsert(id, &email, Some("Test User"), "user", pool).await?;
    Ok(id)
}

/// Application input with sensible defaults and a unique slug.
pub fn retailer_application(name: &str) -> NewRetailerApplication {
    NewRetailerApplication {
        name: name.to_string(),
        slug: Some(format!("retailer-{}", suffix())),
        entity_type: "LLC".to_string(),
        state: "MN".to_string(),
        year_established: Some(2015),
        email: format!("owner-{}@example.com", suffix()),
        phone: Some("555-0100".to_string()),
        website_url: Some("https://example.com".to_string()),
        inventory_volume: Some("100-500".to_string()),
        categories: vec!["electronics".to_string()],
        conditions: vec!["new".to_string()],
        discount_range: Some("20-40%".to_string()),
        storage_location: Some("Warehouse".to_string()),
        min_margin: Some(10),
        allow_dynamic_markdowns: true,
        allow_flash_sales: false,
        user_id: None,
    }
}

/// Submit a pending retailer application.
pub async fn create_pending_retailer(pool: &PgPool, name: &str) -> Result<RetailerApplication> {
    let data = retailer_application(name);
    let slug = data.slug.clone().unwrap();
    let retailer = RetailerApplication::submit(&data, &slug, pool).await?;
    Ok(retailer)
}

/// Create an approved category to file deals under.
pub async fn create_category(pool: &PgPool, name: &str) -> Result<Category> {
    let slug = format!("category-{}", suffix());
    let data = NewCategory {
        name: name.to_string(),
        slug: Some(slug.clone()),
        description: None,
        is_active: true,
    };
    let category = Category::create(&data, &slug, pool).await?;
    Ok(category)
}

/// Deal input with sensible defaults, filed under the given catalog slugs.
pub fn deal_input(name: &str, category_slug: &str, retailer_slug: &str) -> NewDeal {
    NewDeal {
        product_name: name.to_string(),
        slug: Some(format!("deal-{}", suffix())),
        description: "A heavily discounted test product".to_string(),
        price: 2_500,
        original_price: 10_000,
        quantity: 5,
        category: category_slug.to_string(),
        retailer: retailer_slug.to_string(),
        deal_url: "https://example.com/deal".to_string(),
        image_url: Some("https://example.com/deal.jpg".to_string()),
        expiration_date: Utc::now() + Duration::days(30),
        is_featured: false,
    }
}

/// Submit a pending deal through the model layer (skips action validation).
pub async fn create_pending_deal(
    pool: &PgPool,
    name: &str,
    category_slug: &str,
    retailer_slug: &str,
) -> Result<Deal> {
    let data = deal_input(name, category_slug, retailer_slug);
    let slug = data.slug.clone().unwrap();
    let deal = Deal::submit(&data, &slug, 75, "submitter@example.com", pool).await?;
    Ok(deal)
}
