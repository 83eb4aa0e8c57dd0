use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::window::{RevenueWindow, cents_to_units, charge_date, date_key};
use crate::stripe::Charge;

/// Revenue for one UTC day, in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RevenuePoint {
    #[schema(example = "2024-03-01")]
    pub date: String,
    #[schema(example = 49)]
    pub amount: i64,
}

/// Zero-filled series covering every day of the window.
pub fn zero_series(window: &RevenueWindow) -> Vec<RevenuePoint> {
    window
        .dates()
        .iter()
        .map(|date| RevenuePoint {
            date: date_key(*date),
            amount: 0,
        })
        .collect()
}

/// Accumulates the requested statistics over a single pass of matched charges.
///
/// Only succeeded charges contribute. Each charge is converted to whole units
/// before it is added, so totals equal the sum of rounded charges.
#[derive(Debug, Default)]
pub struct Aggregation {
    total: Option<i64>,
    customers: Option<HashSet<String>>,
    daily: Option<BTreeMap<NaiveDate, i64>>,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_total(mut self) -> Self {
        self.total = Some(0);
        self
    }

    pub fn with_customers(mut self) -> Self {
        self.customers = Some(HashSet::new());
        self
    }

    pub fn with_daily(mut self, window: &RevenueWindow) -> Self {
        self.daily = Some(window.dates().iter().map(|date| (*date, 0)).collect());
        self
    }

    pub fn add(&mut self, charge: &Charge) {
        if !charge.is_succeeded() {
            return;
        }
        let amount = cents_to_units(charge.amount);

        if let Some(total) = self.total.as_mut() {
            *total += amount;
        }

        if let (Some(customers), Some(customer_id)) =
            (self.customers.as_mut(), charge.customer_id())
        {
            customers.insert(customer_id.to_string());
        }

        if let (Some(daily), Some(date)) = (self.daily.as_mut(), charge_date(charge.created)) {
            // Dates outside the window have no bucket and are dropped.
            if let Some(bucket) = daily.get_mut(&date) {
                *bucket += amount;
            }
        }
    }

    pub fn total(&self) -> i64 {
        self.total.unwrap_or(0)
    }

    pub fn customer_count(&self) -> usize {
        self.customers.as_ref().map_or(0, HashSet::len)
    }

    /// Daily buckets oldest to newest; empty when no window was requested.
    pub fn into_series(self) -> Vec<RevenuePoint> {
        self.daily
            .unwrap_or_default()
            .into_iter()
            .map(|(date, amount)| RevenuePoint {
                date: date_key(date),
                amount,
            })
            .collect()
    }
}
