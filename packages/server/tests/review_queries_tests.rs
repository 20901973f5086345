//! Integration tests for the review query service: pending queues, reviewed
//! lists, the flagged-inventory view, and the recently-cleared feed.
//!
//! The test database is shared, so assertions target rows these tests
//! created rather than absolute counts.

mod common;

use chrono::Datelike;

use crate::common::{
    create_admin_profile, create_category, create_pending_deal, create_pending_retailer,
    retailer_application, TestHarness,
};
use server_core::domains::deals::actions as deal_actions;
use server_core::domains::retailers::actions as retailer_actions;
use server_core::domains::retailers::models::RetailerApplication;
use server_core::domains::review::queries::{self, EntityKind};
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn pending_queue_carries_risk_flags(ctx: &TestHarness) {
    let mut data = retailer_application("Flagged Applicant");
    data.email = format!("owner-{}@gmail.com", uuid::Uuid::new_v4().simple());
    data.website_url = None;
    data.year_established = Some(chrono::Utc::now().year());
    let slug = data.slug.clone().unwrap();
    let retailer = RetailerApplication::submit(&data, &slug, &ctx.db_pool)
        .await
        .unwrap();

    let queue = queries::pending_applications(&ctx.db_pool).await.unwrap();
    let entry = queue
        .iter()
        .find(|p| p.application.id == retailer.id)
        .expect("submitted application must appear in the pending queue");

    let texts: Vec<&str> = entry.flags.iter().map(|f| f.text.as_str()).collect();
    assert!(texts.iter().any(|t| t.contains("Free email domain")));
    assert!(texts.iter().any(|t| t.contains("cannot verify legitimacy")));
    assert!(texts.iter().any(|t| t.contains("established recently")));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn pending_queue_is_newest_first(ctx: &TestHarness) {
    let older = create_pending_retailer(&ctx.db_pool, "Older Co").await.unwrap();
    let newer = create_pending_retailer(&ctx.db_pool, "Newer Co").await.unwrap();

    let queue = queries::pending_applications(&ctx.db_pool).await.unwrap();
    let pos_older = queue
        .iter()
        .position(|p| p.application.id == older.id)
        .unwrap();
    let pos_newer = queue
        .iter()
        .position(|p| p.application.id == newer.id)
        .unwrap();
    assert!(pos_newer < pos_older);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reviewed_lists_name_the_acting_admin(ctx: &TestHarness) {
    let admin = create_admin_profile(&ctx.db_pool).await.unwrap();
    let admin_profile =
        server_core::domains::profiles::models::UserProfile::find_by_id(admin, &ctx.db_pool)
            .await
            .unwrap()
            .unwrap();

    let approved = create_pending_retailer(&ctx.db_pool, "Listed Approved").await.unwrap();
    retailer_actions::approve_application(approved.id, admin, None, &ctx.db_pool)
        .await
        .unwrap();

    let rejected = create_pending_retailer(&ctx.db_pool, "Listed Rejected").await.unwrap();
    retailer_actions::reject_application(rejected.id, admin, Some("No".into()), &ctx.db_pool)
        .await
        .unwrap();

    let approved_list = queries::approved_applications(&ctx.db_pool).await.unwrap();
    let entry = approved_list
        .iter()
        .find(|a| a.application.id == approved.id)
        .expect("approved application must appear in the approved list");
    assert_eq!(entry.reviewed_by, admin_profile.email);

    let rejected_list = queries::rejected_applications(&ctx.db_pool).await.unwrap();
    assert!(rejected_list.iter().any(|a| a.application.id == rejected.id));
    assert!(!rejected_list.iter().any(|a| a.application.id == approved.id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn stats_count_created_rows(ctx: &TestHarness) {
    let admin = create_admin_profile(&ctx.db_pool).await.unwrap();
    let pending = create_pending_retailer(&ctx.db_pool, "Stat Pending").await.unwrap();
    let approved = create_pending_retailer(&ctx.db_pool, "Stat Approved").await.unwrap();
    retailer_actions::approve_application(approved.id, admin, None, &ctx.db_pool)
        .await
        .unwrap();

    let stats = queries::compute_stats(EntityKind::Retailer, &ctx.db_pool)
        .await
        .unwrap();

    assert!(stats.pending_count >= 1);
    assert!(stats.approved_count >= 1);
    // At least one recent approval exists, so the rate is a real percentage
    assert!(stats.approval_rate >= 1 && stats.approval_rate <= 100);

    // Keep the pending fixture referenced so the intent is clear
    assert_eq!(pending.status, "pending");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn flagged_inventory_resolves_names_and_risk(ctx: &TestHarness) {
    let admin = create_admin_profile(&ctx.db_pool).await.unwrap();
    let category = create_category(&ctx.db_pool, "Flagged Category").await.unwrap();
    let verified = retailer_actions::create_approved(
        retailer_application("Verified Source"),
        admin,
        &ctx.db_pool,
    )
    .await
    .unwrap();

    // 75% discount and no image: both heuristics fire
    let mut data = crate::common::deal_input("Risky Item", &category.slug, &verified.slug);
    data.image_url = None;
    data.quantity = 500;
    let deal = deal_actions::submit_deal(data, "seller@example.com", &ctx.db_pool)
        .await
        .unwrap();

    let items = queries::flagged_inventory(&ctx.db_pool).await.unwrap();
    let item = items
        .iter()
        .find(|i| i.deal.id == deal.id)
        .expect("pending deal must appear in flagged inventory");

    assert_eq!(item.category_name, "Flagged Category");
    assert_eq!(item.retailer_name, "Verified Source");
    assert_eq!(item.retailer_partner_status, "Verified Partner");
    assert_eq!(item.risk.discount_percent, 75);
    let texts: Vec<&str> = item.risk.flags.iter().map(|f| f.text.as_str()).collect();
    assert!(texts.iter().any(|t| t.contains("Discount")));
    assert!(texts.iter().any(|t| t.contains("High quantity")));
    assert!(texts.iter().any(|t| t.contains("No image")));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn pending_retailer_shows_as_new_partner(ctx: &TestHarness) {
    let category = create_category(&ctx.db_pool, "Partner Category").await.unwrap();
    let pending_retailer = create_pending_retailer(&ctx.db_pool, "Unverified Source")
        .await
        .unwrap();
    let deal = create_pending_deal(
        &ctx.db_pool,
        "Partner Item",
        &category.slug,
        &pending_retailer.slug,
    )
    .await
    .unwrap();

    let items = queries::flagged_inventory(&ctx.db_pool).await.unwrap();
    let item = items.iter().find(|i| i.deal.id == deal.id).unwrap();
    assert_eq!(item.retailer_partner_status, "New Partner");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn recently_cleared_reports_the_clearing_admin(ctx: &TestHarness) {
    let admin = create_admin_profile(&ctx.db_pool).await.unwrap();
    let admin_profile =
        server_core::domains::profiles::models::UserProfile::find_by_id(admin, &ctx.db_pool)
            .await
            .unwrap()
            .unwrap();
    let category = create_category(&ctx.db_pool, "Cleared Category").await.unwrap();
    let retailer = create_pending_retailer(&ctx.db_pool, "Cleared Source").await.unwrap();
    let deal = create_pending_deal(&ctx.db_pool, "Cleared Item", &category.slug, &retailer.slug)
        .await
        .unwrap();

    deal_actions::approve_deal(deal.id, admin, &ctx.db_pool)
        .await
        .unwrap();

    let items = queries::recently_cleared(24, 100, &ctx.db_pool).await.unwrap();
    let item = items
        .iter()
        .find(|i| i.id == deal.id)
        .expect("approved deal must appear in the recently-cleared feed");

    assert_eq!(item.product_name, "Cleared Item");
    assert_eq!(item.retailer_name, "Cleared Source");
    assert_eq!(item.cleared_by, admin_profile.email);
    assert!(item.cleared_at.is_some());
    assert!(!item.original_flag.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn dashboard_metrics_track_created_rows(ctx: &TestHarness) {
    let category = create_category(&ctx.db_pool, "Metric Category").await.unwrap();
    let retailer = create_pending_retailer(&ctx.db_pool, "Metric Source").await.unwrap();
    create_pending_deal(&ctx.db_pool, "Metric Item", &category.slug, &retailer.slug)
        .await
        .unwrap();

    let metrics = queries::dashboard_metrics(&ctx.db_pool).await.unwrap();
    assert!(metrics.total_deals >= 1);
    assert!(metrics.total_categories >= 1);
    assert!(metrics.total_retailers >= 1);
    assert!(metrics.active_deals + metrics.expired_deals <= metrics.total_deals);
}
