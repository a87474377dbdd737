//! Validation for store and product bookkeeping, plus pagination helpers.

use crate::error::CoreError;

/// Maximum length of a shop domain.
pub const MAX_SHOP_DOMAIN_LEN: usize = 255;

/// Maximum length of a product title.
pub const MAX_PRODUCT_TITLE_LEN: usize = 255;

/// Maximum length of a Shopify product identifier.
pub const MAX_SHOPIFY_PRODUCT_ID_LEN: usize = 50;

/// Default page size for product listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Maximum page size for product listings.
pub const MAX_PAGE_LIMIT: i64 = 250;

/// Validate a shop domain such as `acme.myshopify.com`.
pub fn validate_shop_domain(domain: &str) -> Result<(), CoreError> {
    if domain.is_empty() {
        return Err(CoreError::Validation(
            "shop_domain must not be empty".to_string(),
        ));
    }
    if domain.len() > MAX_SHOP_DOMAIN_LEN {
        return Err(CoreError::Validation(format!(
            "shop_domain too long: {} chars (max {MAX_SHOP_DOMAIN_LEN})",
            domain.len()
        )));
    }
    if domain.contains(char::is_whitespace) || domain.contains("://") {
        return Err(CoreError::Validation(format!(
            "shop_domain '{domain}' must be a bare host name"
        )));
    }
    Ok(())
}

/// Validate the identifying fields of a product snapshot.
pub fn validate_product(shopify_product_id: &str, title: &str) -> Result<(), CoreError> {
    if shopify_product_id.trim().is_empty() {
        return Err(CoreError::Validation(
            "shopify_product_id must not be empty".to_string(),
        ));
    }
    if shopify_product_id.len() > MAX_SHOPIFY_PRODUCT_ID_LEN {
        return Err(CoreError::Validation(format!(
            "shopify_product_id too long: {} chars (max {MAX_SHOPIFY_PRODUCT_ID_LEN})",
            shopify_product_id.len()
        )));
    }
    if title.len() > MAX_PRODUCT_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Product title too long: {} chars (max {MAX_PRODUCT_TITLE_LEN})",
            title.len()
        )));
    }
    Ok(())
}

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_shop_domain_passes() {
        assert!(validate_shop_domain("acme.myshopify.com").is_ok());
    }

    #[test]
    fn shop_domain_with_scheme_rejected() {
        let err = validate_shop_domain("https://acme.myshopify.com").unwrap_err();
        assert!(err.to_string().contains("bare host name"));
    }

    #[test]
    fn empty_shop_domain_rejected() {
        assert!(validate_shop_domain("").is_err());
    }

    #[test]
    fn product_without_shopify_id_rejected() {
        let err = validate_product(" ", "Mug").unwrap_err();
        assert!(err.to_string().contains("shopify_product_id"));
    }

    #[test]
    fn overlong_title_rejected() {
        let title = "x".repeat(MAX_PRODUCT_TITLE_LEN + 1);
        assert!(validate_product("123", &title).is_err());
    }

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 50, 250), 50);
    }

    #[test]
    fn clamp_limit_respects_bounds() {
        assert_eq!(clamp_limit(Some(1000), 50, 250), 250);
        assert_eq!(clamp_limit(Some(0), 50, 250), 1);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(Some(-3)), 0);
        assert_eq!(clamp_offset(Some(10)), 10);
    }
}
