//! Read-side aggregation for the review screens.
//!
//! These functions compose the models' SQL into the views the panel renders:
//! pending queues with fresh risk flags, reviewed lists with the acting
//! admin's identity, rolling stats, and the recently-cleared feed. No state
//! is held between requests.

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::DealId;
use crate::domains::categories::models::Category;
use crate::domains::deals::models::Deal;
use crate::domains::retailers::models::RetailerApplication;

use super::risk::{self, DealRiskAssessment, RiskFlag};

/// Trailing window for the approval-rate statistic.
const APPROVAL_RATE_WINDOW_DAYS: i64 = 30;

/// Which reviewable entity a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Retailer,
    Deal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewStats {
    pub pending_count: i64,
    pub approved_count: i64,
    pub rejected_count: i64,
    /// Percentage of recent reviews that were approvals, trailing 30 days.
    pub approval_rate: i32,
}

/// `round(100 * approved / (approved + rejected))`, 0 when nothing was
/// reviewed in the window.
pub fn approval_rate(recent_approved: i64, recent_rejected: i64) -> i32 {
    let total = recent_approved + recent_rejected;
    if total <= 0 {
        return 0;
    }
    ((recent_approved as f64 / total as f64) * 100.0).round() as i32
}

pub async fn compute_stats(kind: EntityKind, pool: &PgPool) -> Result<ReviewStats> {
    let since = Utc::now() - Duration::days(APPROVAL_RATE_WINDOW_DAYS);

    let (pending, approved, rejected, recent_approved, recent_rejected) = match kind {
        EntityKind::Retailer => (
            RetailerApplication::count_by_status("pending", pool).await?,
            RetailerApplication::count_by_status("approved", pool).await?,
            RetailerApplication::count_by_status("rejected", pool).await?,
            RetailerApplication::count_recent_by_status("approved", since, pool).await?,
            RetailerApplication::count_recent_by_status("rejected", since, pool).await?,
        ),
        EntityKind::Deal => (
            Deal::count_by_status("pending", pool).await?,
            Deal::count_by_status("approved", pool).await?,
            Deal::count_by_status("rejected", pool).await?,
            Deal::count_recent_by_status("approved", since, pool).await?,
            Deal::count_recent_by_status("rejected", since, pool).await?,
        ),
    };

    Ok(ReviewStats {
        pending_count: pending,
        approved_count: approved,
        rejected_count: rejected,
        approval_rate: approval_rate(recent_approved, recent_rejected),
    })
}

/// A pending application with freshly computed risk flags.
#[derive(Debug, Clone, Serialize)]
pub struct PendingApplication {
    #[serde(flatten)]
    pub application: RetailerApplication,
    pub flags: Vec<RiskFlag>,
}

pub async fn pending_applications(pool: &PgPool) -> Result<Vec<PendingApplication>> {
    let current_year = Utc::now().year();
    let applications = RetailerApplication::find_pending(pool).await?;
    Ok(applications
        .into_iter()
        .map(|application| {
            let flags = risk::assess_retailer_risk(&application, current_year);
            PendingApplication { application, flags }
        })
        .collect())
}

/// A reviewed application annotated with the acting admin's display identity.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewedApplication {
    #[serde(flatten)]
    pub application: RetailerApplication,
    pub reviewed_by: String,
}

pub async fn approved_applications(pool: &PgPool) -> Result<Vec<ReviewedApplication>> {
    reviewed_applications("approved", pool).await
}

pub async fn rejected_applications(pool: &PgPool) -> Result<Vec<ReviewedApplication>> {
    reviewed_applications("rejected", pool).await
}

async fn reviewed_applications(status: &str, pool: &PgPool) -> Result<Vec<ReviewedApplication>> {
    let rows = RetailerApplication::find_reviewed(status, pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let reviewed_by = display_identity(row.reviewer_email, row.reviewer_name);
            ReviewedApplication {
                application: row.application,
                reviewed_by,
            }
        })
        .collect())
}

/// A pending deal as the flagged-inventory queue shows it.
#[derive(Debug, Clone, Serialize)]
pub struct FlaggedItem {
    #[serde(flatten)]
    pub deal: Deal,
    pub category_name: String,
    pub retailer_name: String,
    pub retailer_partner_status: String,
    pub risk: DealRiskAssessment,
}

pub async fn flagged_inventory(pool: &PgPool) -> Result<Vec<FlaggedItem>> {
    let rows = Deal::find_pending_with_names(pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let risk = risk::assess_deal_risk(&row.deal);
            let retailer_partner_status =
                if row.retailer_partner_status.as_deref() == Some("approved") {
                    "Verified Partner".to_string()
                } else {
                    "New Partner".to_string()
                };
            FlaggedItem {
                category_name: row
                    .category_name
                    .unwrap_or_else(|| "Uncategorized".to_string()),
                retailer_name: row.retailer_name.unwrap_or_else(|| "Unknown".to_string()),
                retailer_partner_status,
                risk,
                deal: row.deal,
            }
        })
        .collect())
}

/// An approved deal in the recently-cleared feed.
#[derive(Debug, Clone, Serialize)]
pub struct ClearedItem {
    pub id: DealId,
    pub product_name: String,
    pub retailer_name: String,
    /// Re-derived from the stored fields; not recorded at approval time.
    pub original_flag: String,
    pub cleared_by: String,
    pub cleared_at: Option<DateTime<Utc>>,
}

pub async fn recently_cleared(
    window_hours: i64,
    limit: i64,
    pool: &PgPool,
) -> Result<Vec<ClearedItem>> {
    let since = Utc::now() - Duration::hours(window_hours);
    let rows = Deal::find_recently_cleared(since, limit, pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| ClearedItem {
            id: row.deal.id,
            product_name: row.deal.product_name.clone(),
            retailer_name: row.retailer_name.unwrap_or_else(|| "Unknown".to_string()),
            original_flag: risk::original_flag_summary(&row.deal),
            cleared_by: display_identity(row.reviewer_email, row.reviewer_name),
            cleared_at: row.deal.approved_at,
        })
        .collect())
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardMetrics {
    pub total_deals: i64,
    pub active_deals: i64,
    pub expired_deals: i64,
    pub total_categories: i64,
    pub total_retailers: i64,
}

pub async fn dashboard_metrics(pool: &PgPool) -> Result<DashboardMetrics> {
    let now = Utc::now();
    Ok(DashboardMetrics {
        total_deals: Deal::count_all(pool).await?,
        active_deals: Deal::count_active(now, pool).await?,
        expired_deals: Deal::count_expired(now, pool).await?,
        total_categories: Category::count_all(pool).await?,
        total_retailers: RetailerApplication::count_all(pool).await?,
    })
}

fn display_identity(email: Option<String>, full_name: Option<String>) -> String {
    email
        .or(full_name)
        .unwrap_or_else(|| "Admin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_rate_empty_window_is_zero() {
        assert_eq!(approval_rate(0, 0), 0);
    }

    #[test]
    fn approval_rate_rounds() {
        assert_eq!(approval_rate(2, 1), 67);
        assert_eq!(approval_rate(1, 2), 33);
        assert_eq!(approval_rate(5, 0), 100);
        assert_eq!(approval_rate(0, 5), 0);
    }

    #[test]
    fn display_identity_prefers_email() {
        assert_eq!(
            display_identity(Some("a@x.com".into()), Some("Ann".into())),
            "a@x.com"
        );
        assert_eq!(display_identity(None, Some("Ann".into())), "Ann");
        assert_eq!(display_identity(None, None), "Admin");
    }
}
