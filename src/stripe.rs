//! Stripe REST client
//!
//! # Module Structure
//! - `client`: HTTP client and the `BillingApi` seam used by aggregation
//! - `types`: Response shapes for prices, charges and invoices

mod client;
mod types;

pub use client::{BillingApi, ChargeQuery, PAGE_LIMIT, StripeClient};
pub use types::{
    Charge, ChargeStatus, Customer, Expandable, Identified, Invoice, InvoiceLines, LineItem,
    LinePrice, ListPage, Price, Product,
};
