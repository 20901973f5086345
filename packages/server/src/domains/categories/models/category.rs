use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::CategoryId;

/// Category - a catalog entity deals are filed under.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    // Denormalized, maintained by the deal CRUD layer
    pub deal_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Category {
    pub async fn find_by_id(id: CategoryId, pool: &PgPool) -> Result<Option<Self>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(category)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
                .fetch_all(pool)
                .await?;
        Ok(categories)
    }

    pub async fn slug_exists(slug: &str, pool: &PgPool) -> Result<bool> {
        let existing: Option<(CategoryId,)> =
            sqlx::query_as("SELECT id FROM categories WHERE slug = $1 LIMIT 1")
                .bind(slug)
                .fetch_optional(pool)
                .await?;
        Ok(existing.is_some())
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn create(data: &NewCategory, slug: &str, pool: &PgPool) -> Result<Self> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, description, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(slug)
        .bind(&data.description)
        .bind(data.is_active)
        .fetch_one(pool)
        .await?;
        Ok(category)
    }

    pub async fn delete(id: CategoryId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn increment_deal_count(slug: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "UPDATE categories SET deal_count = deal_count + 1, updated_at = NOW() WHERE slug = $1",
        )
        .bind(slug)
        .execute(pool)
        .await?;
        Ok(())
    }
}
