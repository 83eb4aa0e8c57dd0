use std::collections::HashSet;

use tracing::debug;

use crate::error::StripeError;
use crate::stripe::{BillingApi, Charge, ChargeQuery};

/// Every price id that belongs to `product_id`.
pub async fn collect_price_ids(
    api: &dyn BillingApi,
    product_id: &str,
) -> Result<HashSet<String>, StripeError> {
    let mut price_ids = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let page = api.list_prices(product_id, cursor.as_deref()).await?;
        pages += 1;
        price_ids.extend(page.data.iter().map(|price| price.id.clone()));

        match page.next_cursor() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    debug!(
        product_id = product_id,
        pages = pages,
        prices = price_ids.len(),
        "Collected product prices"
    );
    Ok(price_ids)
}

/// Walk every charge created at or after `created_gte` (all charges when
/// `None`), handing each one to `visit`. Returns the number of charges seen.
pub async fn for_each_charge<F>(
    api: &dyn BillingApi,
    created_gte: Option<i64>,
    mut visit: F,
) -> Result<usize, StripeError>
where
    F: FnMut(&Charge) + Send,
{
    let mut query = ChargeQuery {
        created_gte,
        starting_after: None,
    };
    let mut pages = 0u32;
    let mut seen = 0usize;

    loop {
        let page = api.list_charges(&query).await?;
        pages += 1;
        seen += page.data.len();
        page.data.iter().for_each(&mut visit);

        match page.next_cursor() {
            Some(next) => query.starting_after = Some(next.to_string()),
            None => break,
        }
    }

    debug!(
        created_gte = ?created_gte,
        pages = pages,
        charges = seen,
        "Scanned charge history"
    );
    Ok(seen)
}
