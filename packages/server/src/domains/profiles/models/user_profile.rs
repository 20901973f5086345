use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::UserId;

/// UserProfile - the account record kept in step with the external auth
/// provider. `retailer_status` mirrors the linked application's status so the
/// user-facing site can gate retailer features without joining.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String, // 'admin', 'retailer', 'user'
    pub retailer_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl UserProfile {
    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        let profile =
            sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(profile)
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Mirror the linked application's review status onto the profile.
    pub async fn set_retailer_status(id: UserId, status: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "UPDATE user_profiles SET retailer_status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Upsert a profile record from the auth provider's account data.
    pub async fn upsert(
        id: UserId,
        email: &str,
        full_name: Option<&str>,
        role: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (id, email, full_name, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                full_name = EXCLUDED.full_name,
                role = EXCLUDED.role,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(full_name)
        .bind(role)
        .fetch_one(pool)
        .await?;
        Ok(profile)
    }
}
