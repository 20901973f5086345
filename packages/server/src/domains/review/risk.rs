//! Heuristic risk flags for submissions awaiting review.
//!
//! Flags are derived, never persisted: they are recomputed from the stored
//! entity on every read. All functions here are pure and total over
//! well-formed rows; degenerate numeric inputs produce 0, never a panic or
//! NaN.

use serde::Serialize;

use crate::domains::deals::models::Deal;
use crate::domains::retailers::models::RetailerApplication;

const FREE_EMAIL_DOMAINS: [&str; 4] = ["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"];

/// A retailer application younger than this many years gets flagged.
const RECENT_ENTITY_YEARS: i32 = 3;

/// Discounts above this percentage get a high-severity flag.
const DISCOUNT_FLAG_THRESHOLD: i32 = 50;

/// Quantities above this get flagged.
const QUANTITY_FLAG_THRESHOLD: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Default,
    High,
}

/// A derived warning attached to a submission for reviewer attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskFlag {
    pub text: String,
    pub severity: Severity,
}

impl RiskFlag {
    fn new(text: &str, severity: Severity) -> Self {
        Self {
            text: text.to_string(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct DealRiskAssessment {
    pub discount_percent: i32,
    pub flags: Vec<RiskFlag>,
    pub risk_level: RiskLevel,
}

/// Risk flags for a retailer application. Rules are evaluated independently;
/// every applicable flag accumulates.
pub fn assess_retailer_risk(app: &RetailerApplication, current_year: i32) -> Vec<RiskFlag> {
    let mut flags = Vec::new();

    if let Some((_, domain)) = app.email.rsplit_once('@') {
        if FREE_EMAIL_DOMAINS.contains(&domain.to_ascii_lowercase().as_str()) {
            flags.push(RiskFlag::new("Free email domain", Severity::Default));
        }
    }

    let no_website = match app.website_url.as_deref() {
        None => true,
        Some(url) => url == "None provided",
    };
    if no_website {
        flags.push(RiskFlag::new(
            "No website — cannot verify legitimacy",
            Severity::High,
        ));
    }

    if let Some(year) = app.year_established {
        if current_year - year < RECENT_ENTITY_YEARS {
            flags.push(RiskFlag::new(
                "Entity established recently",
                Severity::Default,
            ));
        }
    }

    flags
}

/// Effective discount for a deal as reviewers see it:
/// `round(100 * (1 - price / original_price))`, 0 when original_price <= 0.
pub fn discount_percent(original_price: i64, price: i64) -> i32 {
    if original_price <= 0 {
        return 0;
    }
    ((1.0 - price as f64 / original_price as f64) * 100.0).round() as i32
}

/// Risk assessment for a submitted deal.
pub fn assess_deal_risk(deal: &Deal) -> DealRiskAssessment {
    let discount = discount_percent(deal.original_price, deal.price);
    let mut flags = Vec::new();

    if discount > DISCOUNT_FLAG_THRESHOLD {
        flags.push(RiskFlag::new("Discount >50%", Severity::High));
    }
    if deal.quantity > QUANTITY_FLAG_THRESHOLD {
        flags.push(RiskFlag::new("High quantity", Severity::Default));
    }
    if deal.image_url.is_none() {
        flags.push(RiskFlag::new("No image", Severity::Default));
    }

    let risk_level = if discount > DISCOUNT_FLAG_THRESHOLD
        || flags.iter().any(|f| f.severity == Severity::High)
    {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    };

    DealRiskAssessment {
        discount_percent: discount,
        flags,
        risk_level,
    }
}

/// Reconstructed "original flag" summary for a cleared deal, re-derived from
/// the stored fields rather than stored at approval time.
pub fn original_flag_summary(deal: &Deal) -> String {
    let discount = discount_percent(deal.original_price, deal.price);
    let mut flags = Vec::new();
    if discount > DISCOUNT_FLAG_THRESHOLD {
        flags.push("Discount >50%");
    }
    if deal.quantity > QUANTITY_FLAG_THRESHOLD {
        flags.push("High quantity");
    }
    if flags.is_empty() {
        "Standard review".to_string()
    } else {
        flags.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{DealId, RetailerId};
    use chrono::{Datelike, Duration, Utc};

    fn application(email: &str, website_url: Option<&str>, year_established: Option<i32>) -> RetailerApplication {
        let now = Utc::now();
        RetailerApplication {
            id: RetailerId::new(),
            name: "Liquidation Partners".to_string(),
            slug: "liquidation-partners".to_string(),
            entity_type: "LLC".to_string(),
            state: "MN".to_string(),
            year_established,
            email: email.to_string(),
            phone: None,
            website_url: website_url.map(str::to_string),
            inventory_volume: Some("100-500 units/mo".to_string()),
            categories: vec!["electronics".to_string()],
            conditions: vec!["new".to_string()],
            discount_range: Some("30-60%".to_string()),
            storage_location: None,
            min_margin: Some(15),
            allow_dynamic_markdowns: false,
            allow_flash_sales: false,
            status: "pending".to_string(),
            is_active: false,
            approved_at: None,
            approved_by: None,
            approval_notes: None,
            rejection_reason: None,
            deal_count: 0,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn deal(original_price: i64, price: i64, quantity: i32, image_url: Option<&str>) -> Deal {
        let now = Utc::now();
        Deal {
            id: DealId::new(),
            product_name: "Noise-cancelling headphones".to_string(),
            slug: "noise-cancelling-headphones".to_string(),
            description: "Refurbished, grade A".to_string(),
            price,
            original_price,
            savings_percentage: 0,
            quantity,
            category: "electronics".to_string(),
            retailer: "liquidation-partners".to_string(),
            deal_url: "https://example.com/deal".to_string(),
            image_url: image_url.map(str::to_string),
            expiration_date: now + Duration::days(30),
            status: "pending".to_string(),
            is_active: false,
            is_featured: false,
            approved_at: None,
            approved_by: None,
            rejection_reason: None,
            created_by: "retailer@example.com".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn flags_accumulate_for_risky_application() {
        let current_year = Utc::now().year();
        let app = application("x@gmail.com", None, Some(current_year - 1));
        let flags = assess_retailer_risk(&app, current_year);

        assert_eq!(flags.len(), 3);
        assert_eq!(flags[0], RiskFlag::new("Free email domain", Severity::Default));
        assert_eq!(
            flags[1],
            RiskFlag::new("No website — cannot verify legitimacy", Severity::High)
        );
        assert_eq!(
            flags[2],
            RiskFlag::new("Entity established recently", Severity::Default)
        );
    }

    #[test]
    fn clean_application_has_no_flags() {
        let app = application("contact@acmeliquidation.com", Some("https://acme.example"), Some(2005));
        assert!(assess_retailer_risk(&app, 2026).is_empty());
    }

    #[test]
    fn free_email_domain_is_case_insensitive() {
        let app = application("x@GMAIL.com", Some("https://acme.example"), Some(2005));
        let flags = assess_retailer_risk(&app, 2026);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].text, "Free email domain");
    }

    #[test]
    fn website_sentinel_counts_as_missing() {
        let app = application("a@acme.example", Some("None provided"), Some(2005));
        let flags = assess_retailer_risk(&app, 2026);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].severity, Severity::High);
    }

    #[test]
    fn recent_entity_boundary_is_exactly_three_years() {
        let current_year = Utc::now().year();

        let this_year = application("a@acme.example", Some("https://acme.example"), Some(current_year));
        assert!(assess_retailer_risk(&this_year, current_year)
            .iter()
            .any(|f| f.text == "Entity established recently"));

        let three_years = application(
            "a@acme.example",
            Some("https://acme.example"),
            Some(current_year - 3),
        );
        assert!(assess_retailer_risk(&three_years, current_year)
            .iter()
            .all(|f| f.text != "Entity established recently"));
    }

    #[test]
    fn missing_year_established_is_not_flagged() {
        let app = application("a@acme.example", Some("https://acme.example"), None);
        assert!(assess_retailer_risk(&app, 2026).is_empty());
    }

    #[test]
    fn steep_discount_is_high_risk() {
        let d = deal(10000, 4000, 50, Some("https://example.com/img.jpg"));
        let assessment = assess_deal_risk(&d);

        assert_eq!(assessment.discount_percent, 60);
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(assessment.flags.len(), 1);
        assert_eq!(
            assessment.flags[0],
            RiskFlag::new("Discount >50%", Severity::High)
        );
    }

    #[test]
    fn zero_original_price_never_panics() {
        let d = deal(0, 4000, 50, Some("https://example.com/img.jpg"));
        let assessment = assess_deal_risk(&d);

        assert_eq!(assessment.discount_percent, 0);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert!(assessment.flags.is_empty());
    }

    #[test]
    fn moderate_deal_is_medium_risk() {
        let d = deal(10000, 7000, 120, None);
        let assessment = assess_deal_risk(&d);

        assert_eq!(assessment.discount_percent, 30);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        let texts: Vec<_> = assessment.flags.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["High quantity", "No image"]);
    }

    #[test]
    fn flag_summary_reconstruction() {
        assert_eq!(
            original_flag_summary(&deal(10000, 4000, 200, None)),
            "Discount >50%, High quantity"
        );
        assert_eq!(
            original_flag_summary(&deal(10000, 8000, 10, None)),
            "Standard review"
        );
    }
}
