//! Response shapes for the subset of the Stripe REST API used by the service.
//!
//! Only the fields needed for revenue attribution are modelled; anything else
//! in the payload is ignored during deserialization.

use std::collections::HashMap;

use serde::Deserialize;

/// Anything that can serve as a `starting_after` cursor.
pub trait Identified {
    fn id(&self) -> &str;
}

/// One page of a Stripe list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T: Identified> ListPage<T> {
    /// Cursor for the next page, if the provider reports more and the cursor can advance.
    pub fn next_cursor(&self) -> Option<&str> {
        if !self.has_more {
            return None;
        }
        self.data.last().map(Identified::id)
    }
}

/// A field that is either a bare id or the expanded object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Id(String),
    Object(T),
}

impl<T: Identified> Expandable<T> {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Object(object) => object.id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Price {
    pub id: String,
}

impl Identified for Price {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    pub id: String,
}

impl Identified for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Customer {
    pub id: String,
}

impl Identified for Customer {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Price attached to an invoice line item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinePrice {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub product: Option<Expandable<Product>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub price: Option<LinePrice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvoiceLines {
    #[serde(default = "Vec::new")]
    pub data: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub lines: Option<InvoiceLines>,
}

impl Invoice {
    pub fn line_items(&self) -> &[LineItem] {
        self.lines.as_ref().map_or(&[], |lines| lines.data.as_slice())
    }
}

impl Identified for Invoice {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    Succeeded,
    Pending,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Charge {
    pub id: String,
    /// Amount in the smallest currency unit (cents).
    pub amount: i64,
    /// Unix timestamp in seconds.
    pub created: i64,
    #[serde(default)]
    pub status: ChargeStatus,
    #[serde(default)]
    pub customer: Option<Expandable<Customer>>,
    #[serde(default)]
    pub invoice: Option<Expandable<Invoice>>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl Charge {
    pub fn is_succeeded(&self) -> bool {
        self.status == ChargeStatus::Succeeded
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer.as_ref().map(Expandable::id)
    }

    /// Invoice line items, only available when the invoice was expanded.
    pub fn invoice_line_items(&self) -> &[LineItem] {
        match &self.invoice {
            Some(Expandable::Object(invoice)) => invoice.line_items(),
            _ => &[],
        }
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.get(key))
            .map(String::as_str)
    }
}

impl Identified for Charge {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Stripe error envelope: `{"error": {"message": "...", "type": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}
