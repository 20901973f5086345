//! Form/data validation helpers shared by the CRUD and submission paths.
//!
//! All functions are pure; storage-dependent checks (slug uniqueness) live in
//! the models.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Field-keyed validation errors, serialized to the caller as a JSON map.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Derived discount metric shown to reviewers and end users.
///
/// `round(100 * (original_price - price) / original_price)`, clamped to 0 for
/// degenerate inputs (original_price <= 0, price < 0, or price >=
/// original_price). Total over any input; never panics.
pub fn savings_percentage(original_price: i64, price: i64) -> i32 {
    if original_price <= 0 || price < 0 || price >= original_price {
        return 0;
    }
    let ratio = (original_price - price) as f64 / original_price as f64;
    (ratio * 100.0).round() as i32
}

/// URL-safe slug: lowercase letters, digits, and hyphens only.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Derive a slug from a display name: lowercase, non-alphanumerics collapsed
/// to single hyphens, trimmed of leading/trailing hyphens.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // swallow leading separators
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Accepts absolute http(s) URLs only.
pub fn is_valid_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Expiration dates must be in the future at submission time.
pub fn is_future_date(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    date > now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn savings_percentage_normal_case() {
        assert_eq!(savings_percentage(10000, 4000), 60);
        assert_eq!(savings_percentage(10000, 7500), 25);
    }

    #[test]
    fn savings_percentage_rounds() {
        // 100 * (300 - 100) / 300 = 66.67 -> 67
        assert_eq!(savings_percentage(300, 100), 67);
        // 100 * (300 - 200) / 300 = 33.33 -> 33
        assert_eq!(savings_percentage(300, 200), 33);
    }

    #[test]
    fn savings_percentage_degenerate_inputs_are_zero() {
        assert_eq!(savings_percentage(0, 4000), 0);
        assert_eq!(savings_percentage(-100, 50), 0);
        assert_eq!(savings_percentage(10000, -1), 0);
        assert_eq!(savings_percentage(10000, 10000), 0);
        assert_eq!(savings_percentage(10000, 12000), 0);
    }

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("summer-sale-2024"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Summer-Sale"));
        assert!(!is_valid_slug("summer sale"));
        assert!(!is_valid_slug("summer_sale"));
    }

    #[test]
    fn slug_generation() {
        assert_eq!(generate_slug("Summer Sale 2024"), "summer-sale-2024");
        assert_eq!(generate_slug("  50% Off!!  "), "50-off");
        assert_eq!(generate_slug("Déjà Vu"), "d-j-vu");
    }

    #[test]
    fn url_validation() {
        assert!(is_valid_url("https://example.com/deal"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
    }

    #[test]
    fn future_date_check() {
        let now = Utc::now();
        assert!(is_future_date(now + Duration::days(1), now));
        assert!(!is_future_date(now - Duration::days(1), now));
        assert!(!is_future_date(now, now));
    }
}
