use std::collections::HashSet;

use crate::stripe::Charge;

/// Metadata key that attributes a charge to a product directly.
pub const PRODUCT_ID_METADATA_KEY: &str = "product_id";

/// Decides whether a charge belongs to one Stripe product.
#[derive(Debug, Clone)]
pub struct ProductMatcher {
    product_id: String,
    price_ids: HashSet<String>,
}

impl ProductMatcher {
    pub fn new(product_id: impl Into<String>, price_ids: HashSet<String>) -> Self {
        Self {
            product_id: product_id.into(),
            price_ids,
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn price_count(&self) -> usize {
        self.price_ids.len()
    }

    /// A charge matches when an expanded invoice line references the product
    /// or one of its prices, or when its metadata names the product.
    pub fn matches(&self, charge: &Charge) -> bool {
        let by_line_item = charge
            .invoice_line_items()
            .iter()
            .filter_map(|item| item.price.as_ref())
            .any(|price| {
                price
                    .product
                    .as_ref()
                    .is_some_and(|product| product.id() == self.product_id)
                    || price
                        .id
                        .as_ref()
                        .is_some_and(|id| self.price_ids.contains(id))
            });

        by_line_item
            || charge.metadata_value(PRODUCT_ID_METADATA_KEY) == Some(self.product_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn charge(value: serde_json::Value) -> Charge {
        serde_json::from_value(value).unwrap()
    }

    fn matcher() -> ProductMatcher {
        ProductMatcher::new(
            "prod_copy",
            ["price_monthly".to_string(), "price_yearly".to_string()]
                .into_iter()
                .collect(),
        )
    }

    #[test]
    fn test_matches_line_item_product() {
        let c = charge(json!({
            "id": "ch_1", "amount": 900, "created": 0, "status": "succeeded",
            "invoice": {"id": "in_1", "lines": {"data": [
                {"price": {"id": "price_other", "product": "prod_copy"}}
            ]}}
        }));
        assert!(matcher().matches(&c));
    }

    #[test]
    fn test_matches_line_item_price_id() {
        let c = charge(json!({
            "id": "ch_2", "amount": 900, "created": 0, "status": "succeeded",
            "invoice": {"id": "in_2", "lines": {"data": [
                {"price": null},
                {"price": {"id": "price_yearly", "product": "prod_unrelated"}}
            ]}}
        }));
        assert!(matcher().matches(&c));
    }

    #[test]
    fn test_matches_metadata() {
        let c = charge(json!({
            "id": "ch_3", "amount": 900, "created": 0, "status": "succeeded",
            "metadata": {"product_id": "prod_copy"}
        }));
        assert!(matcher().matches(&c));
    }

    #[test]
    fn test_ignores_unexpanded_invoice() {
        let c = charge(json!({
            "id": "ch_4", "amount": 900, "created": 0, "status": "succeeded",
            "invoice": "in_4",
            "metadata": {}
        }));
        assert!(!matcher().matches(&c));
    }

    #[test]
    fn test_rejects_other_product() {
        let c = charge(json!({
            "id": "ch_5", "amount": 900, "created": 0, "status": "succeeded",
            "invoice": {"id": "in_5", "lines": {"data": [
                {"price": {"id": "price_x", "product": {"id": "prod_other"}}}
            ]}},
            "metadata": {"product_id": "prod_other"}
        }));
        assert!(!matcher().matches(&c));
    }

    #[test]
    fn test_matching_ignores_status() {
        let c = charge(json!({
            "id": "ch_6", "amount": 900, "created": 0, "status": "failed",
            "metadata": {"product_id": "prod_copy"}
        }));
        assert!(matcher().matches(&c));
    }
}
