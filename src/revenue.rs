//! Revenue aggregation over Stripe charge history
//!
//! # Module Structure
//! - `matcher`: Attributes a charge to a product via invoice lines or metadata
//! - `paging`: Cursor loops over the price and charge list endpoints
//! - `window`: Trailing UTC day window and unit conversion
//! - `aggregate`: Single-pass accumulation of totals, customers and daily buckets
//! - `service`: Degrade-to-zero entry points used by the HTTP layer

mod aggregate;
mod matcher;
mod paging;
mod service;
mod window;

pub use aggregate::{Aggregation, RevenuePoint, zero_series};
pub use matcher::{PRODUCT_ID_METADATA_KEY, ProductMatcher};
pub use paging::{collect_price_ids, for_each_charge};
pub use service::{ProductTotals, RevenueService, SiteStats};
pub use window::{RevenueWindow, cents_to_units};

#[cfg(test)]
pub(crate) use paging::fake;
