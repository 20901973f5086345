use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{DealId, UserId};

/// Deal - a discounted product listing submitted by a retailer (pending) or
/// created directly by an admin (born approved).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deal {
    pub id: DealId,
    pub product_name: String,
    pub slug: String,
    pub description: String,

    // Commerce - prices in minor currency units (cents)
    pub price: i64,
    pub original_price: i64,
    pub savings_percentage: i32,
    pub quantity: i32,

    // Slug references into the catalog
    pub category: String,
    pub retailer: String,

    pub deal_url: String,
    pub image_url: Option<String>,
    pub expiration_date: DateTime<Utc>,

    // Review workflow
    pub status: String, // 'pending', 'approved', 'rejected'
    pub is_active: bool,
    pub is_featured: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<UserId>,
    pub rejection_reason: Option<String>,

    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied on deal submission or admin creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDeal {
    pub product_name: String,
    pub slug: Option<String>,
    pub description: String,
    pub price: i64,
    pub original_price: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub category: String,
    pub retailer: String,
    pub deal_url: String,
    pub image_url: Option<String>,
    pub expiration_date: DateTime<Utc>,
    #[serde(default)]
    pub is_featured: bool,
}

fn default_quantity() -> i32 {
    1
}

/// A pending deal joined with catalog display names for the review queue.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingDealRow {
    #[sqlx(flatten)]
    pub deal: Deal,
    pub category_name: Option<String>,
    pub retailer_name: Option<String>,
    pub retailer_partner_status: Option<String>,
}

/// An approved deal joined with the clearing admin and retailer name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClearedDealRow {
    #[sqlx(flatten)]
    pub deal: Deal,
    pub retailer_name: Option<String>,
    pub reviewer_email: Option<String>,
    pub reviewer_name: Option<String>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Deal {
    pub async fn find_by_id(id: DealId, pool: &PgPool) -> Result<Option<Self>> {
        let deal = sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(deal)
    }

    pub async fn slug_exists(slug: &str, pool: &PgPool) -> Result<bool> {
        let existing: Option<(DealId,)> =
            sqlx::query_as("SELECT id FROM deals WHERE slug = $1 LIMIT 1")
                .bind(slug)
                .fetch_optional(pool)
                .await?;
        Ok(existing.is_some())
    }

    /// Pending deals, newest first, with catalog display names resolved.
    pub async fn find_pending_with_names(pool: &PgPool) -> Result<Vec<PendingDealRow>> {
        let rows = sqlx::query_as::<_, PendingDealRow>(
            r#"
            SELECT
                d.*,
                c.name AS category_name,
                r.name AS retailer_name,
                r.status AS retailer_partner_status
            FROM deals d
            LEFT JOIN categories c ON c.slug = d.category
            LEFT JOIN retailers r ON r.slug = d.retailer
            WHERE d.status = 'pending'
            ORDER BY d.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Deals approved within the trailing window, most recent first.
    pub async fn find_recently_cleared(
        since: DateTime<Utc>,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<ClearedDealRow>> {
        let rows = sqlx::query_as::<_, ClearedDealRow>(
            r#"
            SELECT
                d.*,
                r.name AS retailer_name,
                p.email AS reviewer_email,
                p.full_name AS reviewer_name
            FROM deals d
            LEFT JOIN retailers r ON r.slug = d.retailer
            LEFT JOIN user_profiles p ON p.id = d.approved_by
            WHERE d.status = 'approved' AND d.approved_at >= $1
            ORDER BY d.approved_at DESC
            LIMIT $2
            "#,
        )
        .bind(since)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_by_status(status: &str, pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM deals WHERE status = $1")
            .bind(status)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn count_recent_by_status(
        status: &str,
        since: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM deals WHERE status = $1 AND updated_at >= $2")
                .bind(status)
                .bind(since)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM deals")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn count_active(now: DateTime<Utc>, pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM deals WHERE is_active = TRUE AND expiration_date > $1",
        )
        .bind(now)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    pub async fn count_expired(now: DateTime<Utc>, pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM deals WHERE expiration_date <= $1")
                .bind(now)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    pub async fn count_by_retailer(retailer_slug: &str, pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM deals WHERE retailer = $1")
            .bind(retailer_slug)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Insert a retailer-submitted deal in 'pending' status.
    pub async fn submit(
        data: &NewDeal,
        slug: &str,
        savings_percentage: i32,
        created_by: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            INSERT INTO deals (
                product_name, slug, description,
                price, original_price, savings_percentage, quantity,
                category, retailer, deal_url, image_url, expiration_date,
                status, is_active, is_featured, created_by
            ) VALUES (
                $1, $2, $3,
                $4, $5, $6, $7,
                $8, $9, $10, $11, $12,
                'pending', FALSE, $13, $14
            )
            RETURNING *
            "#,
        )
        .bind(&data.product_name)
        .bind(slug)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.original_price)
        .bind(savings_percentage)
        .bind(data.quantity)
        .bind(&data.category)
        .bind(&data.retailer)
        .bind(&data.deal_url)
        .bind(&data.image_url)
        .bind(data.expiration_date)
        .bind(data.is_featured)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(deal)
    }

    /// Insert an admin-created deal: born approved and active.
    pub async fn create_approved(
        data: &NewDeal,
        slug: &str,
        savings_percentage: i32,
        creator: UserId,
        created_by: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            INSERT INTO deals (
                product_name, slug, description,
                price, original_price, savings_percentage, quantity,
                category, retailer, deal_url, image_url, expiration_date,
                status, is_active, is_featured, approved_at, approved_by, created_by
            ) VALUES (
                $1, $2, $3,
                $4, $5, $6, $7,
                $8, $9, $10, $11, $12,
                'approved', TRUE, $13, NOW(), $14, $15
            )
            RETURNING *
            "#,
        )
        .bind(&data.product_name)
        .bind(slug)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.original_price)
        .bind(savings_percentage)
        .bind(data.quantity)
        .bind(&data.category)
        .bind(&data.retailer)
        .bind(&data.deal_url)
        .bind(&data.image_url)
        .bind(data.expiration_date)
        .bind(data.is_featured)
        .bind(creator)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(deal)
    }

    /// Conditional approve keyed on the status the caller observed. Returns
    /// None when no row matched (either gone or concurrently moved).
    pub async fn mark_approved(
        id: DealId,
        approved_by: UserId,
        expected_status: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            UPDATE deals
            SET
                status = 'approved',
                is_active = TRUE,
                approved_at = NOW(),
                approved_by = $2,
                rejection_reason = NULL,
                updated_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(approved_by)
        .bind(expected_status)
        .fetch_optional(pool)
        .await?;
        Ok(deal)
    }

    /// Conditional reject; `approved_by` records the rejecting admin.
    pub async fn mark_rejected(
        id: DealId,
        rejected_by: UserId,
        reason: &str,
        expected_status: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            UPDATE deals
            SET
                status = 'rejected',
                is_active = FALSE,
                approved_at = NULL,
                approved_by = $2,
                rejection_reason = $3,
                updated_at = NOW()
            WHERE id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(rejected_by)
        .bind(reason)
        .bind(expected_status)
        .fetch_optional(pool)
        .await?;
        Ok(deal)
    }
}
