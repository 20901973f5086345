use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{RetailerId, UserId};

/// RetailerApplication - a retailer's application for platform access.
///
/// Approved retailers double as catalog entities (slug, deal_count), matching
/// the single `retailers` table the panel reads.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RetailerApplication {
    pub id: RetailerId,
    pub name: String,
    pub slug: String,
    pub entity_type: String,
    pub state: String,
    pub year_established: Option<i32>,

    // Contact
    pub email: String,
    pub phone: Option<String>,
    pub website_url: Option<String>,

    // Inventory profile
    pub inventory_volume: Option<String>,
    pub categories: Vec<String>,
    pub conditions: Vec<String>,
    pub discount_range: Option<String>,
    pub storage_location: Option<String>,

    // Controls
    pub min_margin: Option<i32>,
    pub allow_dynamic_markdowns: bool,
    pub allow_flash_sales: bool,

    // Review workflow
    pub status: String, // 'pending', 'approved', 'rejected'
    pub is_active: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<UserId>,
    pub approval_notes: Option<String>,
    pub rejection_reason: Option<String>,

    // Denormalized, maintained by the deal CRUD layer
    pub deal_count: i32,

    // Lookup key to the applicant's account, not an ownership relationship
    pub user_id: Option<UserId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when an application is submitted or an admin creates a
/// retailer directly.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRetailerApplication {
    pub name: String,
    pub slug: Option<String>,
    pub entity_type: String,
    pub state: String,
    pub year_established: Option<i32>,
    pub email: String,
    pub phone: Option<String>,
    pub website_url: Option<String>,
    pub inventory_volume: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    pub discount_range: Option<String>,
    pub storage_location: Option<String>,
    pub min_margin: Option<i32>,
    #[serde(default)]
    pub allow_dynamic_markdowns: bool,
    #[serde(default)]
    pub allow_flash_sales: bool,
    pub user_id: Option<UserId>,
}

/// An application row joined with the reviewing admin's profile.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplicationWithReviewer {
    #[sqlx(flatten)]
    pub application: RetailerApplication,
    pub reviewer_email: Option<String>,
    pub reviewer_name: Option<String>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl RetailerApplication {
    pub async fn find_by_id(id: RetailerId, pool: &PgPool) -> Result<Option<Self>> {
        let retailer =
            sqlx::query_as::<_, RetailerApplication>("SELECT * FROM retailers WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(retailer)
    }

    pub async fn slug_exists(slug: &str, pool: &PgPool) -> Result<bool> {
        let existing: Option<(RetailerId,)> =
            sqlx::query_as("SELECT id FROM retailers WHERE slug = $1 LIMIT 1")
                .bind(slug)
                .fetch_optional(pool)
                .await?;
        Ok(existing.is_some())
    }

    /// Pending applications, newest first.
    pub async fn find_pending(pool: &PgPool) -> Result<Vec<Self>> {
        let retailers = sqlx::query_as::<_, RetailerApplication>(
            "SELECT * FROM retailers
             WHERE status = 'pending'
             ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(retailers)
    }

    /// Applications in a terminal status, most recently reviewed first,
    /// joined with the reviewing admin's identity.
    pub async fn find_reviewed(status: &str, pool: &PgPool) -> Result<Vec<ApplicationWithReviewer>> {
        let rows = sqlx::query_as::<_, ApplicationWithReviewer>(
            r#"
            SELECT r.*, p.email AS reviewer_email, p.full_name AS reviewer_name
            FROM retailers r
            LEFT JOIN user_profiles p ON p.id = r.approved_by
            WHERE r.status = $1
            ORDER BY r.updated_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_by_status(status: &str, pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM retailers WHERE status = $1")
                .bind(status)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Count of entities reviewed into `status` since `since` (updated_at
    /// window, matching the panel's trailing-30-day approval rate).
    pub async fn count_recent_by_status(
        status: &str,
        since: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM retailers WHERE status = $1 AND updated_at >= $2",
        )
        .bind(status)
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM retailers")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Insert a new application in 'pending' status.
    pub async fn submit(data: &NewRetailerApplication, slug: &str, pool: &PgPool) -> Result<Self> {
        let retailer = sqlx::query_as::<_, RetailerApplication>(
            r#"
            INSERT INTO retailers (
                name, slug, entity_type, state, year_established,
                email, phone, website_url,
                inventory_volume, categories, conditions, discount_range, storage_location,
                min_margin, allow_dynamic_markdowns, allow_flash_sales,
                status, is_active, user_id
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8,
                $9, $10, $11, $12, $13,
                $14, $15, $16,
                'pending', FALSE, $17
            )
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(slug)
        .bind(&data.entity_type)
        .bind(&data.state)
        .bind(data.year_established)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.website_url)
        .bind(&data.inventory_volume)
        .bind(&data.categories)
        .bind(&data.conditions)
        .bind(&data.discount_range)
        .bind(&data.storage_location)
        .bind(data.min_margin)
        .bind(data.allow_dynamic_markdowns)
        .bind(data.allow_flash_sales)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;
        Ok(retailer)
    }

    /// Insert a retailer created by an admin: born approved and active, with
    /// the creating admin recorded as the approver.
    pub async fn create_approved(
        data: &NewRetailerApplication,
        slug: &str,
        creator: UserId,
        pool: &PgPool,
    ) -> Result<Self> {
        let retailer = sqlx::query_as::<_, RetailerApplication>(
            r#"
            INSERT INTO retailers (
                name, slug, entity_type, state, year_established,
                email, phone, website_url,
                inventory_volume, categories, conditions, discount_range, storage_location,
                min_margin, allow_dynamic_markdowns, allow_flash_sales,
                status, is_active, approved_at, approved_by, user_id
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8,
                $9, $10, $11, $12, $13,
                $14, $15, $16,
                'approved', TRUE, NOW(), $17, $18
            )
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(slug)
        .bind(&data.entity_type)
        .bind(&data.state)
        .bind(data.year_established)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.website_url)
        .bind(&data.inventory_volume)
        .bind(&data.categories)
        .bind(&data.conditions)
        .bind(&data.discount_range)
        .bind(&data.storage_location)
        .bind(data.min_margin)
        .bind(data.allow_dynamic_markdowns)
        .bind(data.allow_flash_sales)
        .bind(creator)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;
        Ok(retailer)
    }

    /// Conditional approve keyed on the status the caller observed. Returns
    /// None when no row matched (either gone or concurrently moved).
    pub async fn mark_approved(
        id: RetailerId,
        approved_by: UserId,
        notes: &str,
        expected_status: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let retailer = sqlx::query_as::<_, RetailerApplication>(
            r#"
            UPDATE retailers
            SET
                status = 'approved',
                is_active = TRUE,
                approved_at = NOW(),
                approved_by = $2,
                approval_notes = $3,
                rejection_reason = NULL,
                updated_at = NOW()
            WHERE id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(approved_by)
        .bind(notes)
        .bind(expected_status)
        .fetch_optional(pool)
        .await?;
        Ok(retailer)
    }

    /// Conditional reject; `approved_by` records the rejecting admin.
    pub async fn mark_rejected(
        id: RetailerId,
        rejected_by: UserId,
        reason: &str,
        expected_status: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let retailer = sqlx::query_as::<_, RetailerApplication>(
            r#"
            UPDATE retailers
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
        Ok(retailer)
    }

    pub async fn delete(id: RetailerId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM retailers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn increment_deal_count(slug: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "UPDATE retailers SET deal_count = deal_count + 1, updated_at = NOW() WHERE slug = $1",
        )
        .bind(slug)
        .execute(pool)
        .await?;
        Ok(())
    }
}
