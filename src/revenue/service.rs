use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use super::aggregate::{Aggregation, RevenuePoint, zero_series};
use super::matcher::ProductMatcher;
use super::paging::{collect_price_ids, for_each_charge};
use super::window::RevenueWindow;
use crate::catalog::Project;
use crate::config::MAX_REVENUE_DAYS;
use crate::error::StripeError;
use crate::metrics::Metrics;
use crate::stripe::BillingApi;

/// Lifetime figures for one product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductTotals {
    pub revenue: i64,
    pub customers: usize,
}

/// Site-wide headline numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
    /// Lifetime revenue across all products, in whole currency units
    #[schema(example = 1280)]
    pub total_revenue: i64,
    #[schema(example = 3)]
    pub project_count: usize,
    /// Projects launched on Product Hunt
    #[schema(example = 1)]
    pub launch_count: usize,
    /// Sum of distinct paying customers per product
    #[schema(example = 42)]
    pub customer_count: usize,
}

/// Revenue lookups that never fail: provider problems become zeros.
pub struct RevenueService {
    api: Option<Arc<dyn BillingApi>>,
    metrics: Arc<Metrics>,
    default_days: u32,
}

impl RevenueService {
    pub fn new(api: Option<Arc<dyn BillingApi>>, metrics: Arc<Metrics>, default_days: u32) -> Self {
        Self {
            api,
            metrics,
            default_days: default_days.clamp(1, MAX_REVENUE_DAYS),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.api.is_some()
    }

    pub fn default_days(&self) -> u32 {
        self.default_days
    }

    /// Missing or non-positive values fall back to the default; large ones are clamped.
    pub fn resolve_days(&self, requested: Option<i64>) -> u32 {
        match requested {
            Some(days) if days > 0 => days.min(i64::from(MAX_REVENUE_DAYS)) as u32,
            _ => self.default_days,
        }
    }

    pub async fn daily_revenue(&self, product_id: Option<&str>, days: u32) -> Vec<RevenuePoint> {
        self.daily_revenue_at(product_id, days, Utc::now()).await
    }

    /// Daily revenue for the `days` UTC days ending on the day of `now`.
    pub async fn daily_revenue_at(
        &self,
        product_id: Option<&str>,
        days: u32,
        now: DateTime<Utc>,
    ) -> Vec<RevenuePoint> {
        let window = RevenueWindow::ending_at(now, days);

        let Some(product_id) = product_id.filter(|id| !id.is_empty()) else {
            return zero_series(&window);
        };
        let Some(api) = self.api.as_deref() else {
            self.degraded(product_id, &StripeError::MissingCredential);
            return zero_series(&window);
        };

        let aggregation = Aggregation::new().with_daily(&window);
        match scan(api, product_id, Some(window.cutoff()), aggregation).await {
            Ok(aggregation) => aggregation.into_series(),
            Err(e) => {
                self.degraded(product_id, &e);
                zero_series(&window)
            }
        }
    }

    /// Lifetime revenue and distinct customers, from one pass over all charges.
    pub async fn product_totals(&self, product_id: &str) -> ProductTotals {
        let Some(api) = self.api.as_deref() else {
            self.degraded(product_id, &StripeError::MissingCredential);
            return ProductTotals::default();
        };

        let aggregation = Aggregation::new().with_total().with_customers();
        match scan(api, product_id, None, aggregation).await {
            Ok(aggregation) => ProductTotals {
                revenue: aggregation.total(),
                customers: aggregation.customer_count(),
            },
            Err(e) => {
                self.degraded(product_id, &e);
                ProductTotals::default()
            }
        }
    }

    pub async fn site_stats(&self, projects: &[Project]) -> SiteStats {
        let product_ids: Vec<&str> = projects
            .iter()
            .filter_map(|project| project.stripe_product_id.as_deref())
            .filter(|id| !id.is_empty())
            .collect();

        let totals = join_all(product_ids.iter().map(|id| self.product_totals(id))).await;

        let stats = SiteStats {
            total_revenue: totals.iter().map(|t| t.revenue).sum(),
            project_count: projects.len(),
            launch_count: projects.iter().filter(|p| p.has_launched()).count(),
            customer_count: totals.iter().map(|t| t.customers).sum(),
        };

        info!(
            products = product_ids.len(),
            total_revenue = stats.total_revenue,
            customers = stats.customer_count,
            "Computed site stats"
        );
        stats
    }

    fn degraded(&self, product_id: &str, err: &StripeError) {
        match err {
            StripeError::MissingCredential => {
                debug!(product_id = product_id, "No Stripe key configured, reporting zeros");
            }
            _ => {
                warn!(product_id = product_id, error = %err, "Revenue query failed, reporting zeros");
            }
        }
        self.metrics.record_degraded(err.reason());
    }
}

async fn scan(
    api: &dyn BillingApi,
    product_id: &str,
    created_gte: Option<i64>,
    mut aggregation: Aggregation,
) -> Result<Aggregation, StripeError> {
    let matcher = ProductMatcher::new(product_id, collect_price_ids(api, product_id).await?);

    let mut matched = 0usize;
    let seen = for_each_charge(api, created_gte, |charge| {
        if matcher.matches(charge) {
            matched += 1;
            aggregation.add(charge);
        }
    })
    .await?;

    debug!(
        product_id = product_id,
        prices = matcher.price_count(),
        charges = seen,
        matched = matched,
        "Aggregated product charges"
    );
    Ok(aggregation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revenue::paging::fake::FakeBilling;
    use chrono::TimeZone;
    use prometheus_client::registry::Registry;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 18, 0, 0).unwrap()
    }

    fn at(day: u32, hour: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0)
            .unwrap()
            .timestamp()
    }

    fn metrics() -> (Registry, Arc<Metrics>) {
        let mut registry = Registry::default();
        let metrics = Arc::new(Metrics::new(&mut registry));
        (registry, metrics)
    }

    fn charges() -> Vec<crate::stripe::Charge> {
        serde_json::from_value(json!([
            {
                "id": "ch_1", "amount": 2900, "created": at(9, 10), "status": "succeeded",
                "customer": "cus_a",
                "invoice": {"id": "in_1", "lines": {"data": [{"price": {"id": "price_pro", "product": "prod_other_ref"}}]}}
            },
            {
                "id": "ch_2", "amount": 1049, "created": at(10, 8), "status": "succeeded",
                "customer": {"id": "cus_b"},
                "metadata": {"product_id": "prod_copy"}
            },
            {
                "id": "ch_3", "amount": 5000, "created": at(10, 9), "status": "failed",
                "customer": "cus_c",
                "metadata": {"product_id": "prod_copy"}
            },
            {
                "id": "ch_4", "amount": 9900, "created": at(10, 11), "status": "succeeded",
                "customer": "cus_d",
                "metadata": {"product_id": "prod_elsewhere"}
            },
            {
                "id": "ch_5", "amount": 1000, "created": at(1, 12), "status": "succeeded",
                "customer": "cus_a",
                "invoice": {"id": "in_5", "lines": {"data": [{"price": {"id": "price_x", "product": "prod_copy"}}]}}
            }
        ]))
        .unwrap()
    }

    fn service(api: FakeBilling, days: u32) -> (Registry, RevenueService) {
        let (registry, metrics) = metrics();
        let api: Arc<dyn BillingApi> = Arc::new(api);
        (registry, RevenueService::new(Some(api), metrics, days))
    }

    #[tokio::test]
    async fn test_daily_revenue_buckets_matched_charges() {
        let api = FakeBilling::new(2)
            .with_prices("prod_copy", &["price_pro"])
            .with_charges(charges());
        let (_registry, service) = service(api, 14);

        let series = service.daily_revenue_at(Some("prod_copy"), 3, now()).await;

        assert_eq!(series.len(), 3);
        assert_eq!(series[0], RevenuePoint { date: "2024-05-08".to_string(), amount: 0 });
        assert_eq!(series[1], RevenuePoint { date: "2024-05-09".to_string(), amount: 29 });
        // 10.49 rounds to 10; the failed and foreign charges do not count
        assert_eq!(series[2], RevenuePoint { date: "2024-05-10".to_string(), amount: 10 });
    }

    #[tokio::test]
    async fn test_daily_revenue_without_product_makes_no_calls() {
        let api = Arc::new(FakeBilling::new(10));
        let (_registry, metrics) = metrics();
        let shared: Arc<dyn BillingApi> = api.clone();
        let service = RevenueService::new(Some(shared), metrics, 14);

        let series = service.daily_revenue_at(None, 14, now()).await;
        assert_eq!(series.len(), 14);
        assert!(series.iter().all(|p| p.amount == 0));
        assert_eq!(series.last().unwrap().date, "2024-05-10");
        assert!(api.calls().is_empty());

        let series = service.daily_revenue_at(Some(""), 5, now()).await;
        assert_eq!(series.len(), 5);
    }

    #[tokio::test]
    async fn test_daily_revenue_without_credential() {
        let (registry, metrics) = metrics();
        let service = RevenueService::new(None, metrics, 14);

        let series = service.daily_revenue_at(Some("prod_copy"), 7, now()).await;
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|p| p.amount == 0));
        assert!(!service.is_connected());

        let text = crate::metrics::render(&registry).unwrap();
        assert!(text.contains(r#"reason="missing_credential"} 1"#));
    }

    #[tokio::test]
    async fn test_daily_revenue_degrades_on_error() {
        let api = FakeBilling::new(10).failing();
        let (registry, service) = service(api, 14);

        let series = service.daily_revenue_at(Some("prod_copy"), 14, now()).await;
        assert_eq!(series.len(), 14);
        assert!(series.iter().all(|p| p.amount == 0));

        let text = crate::metrics::render(&registry).unwrap();
        assert!(text.contains(r#"vibe_hub_revenue_degraded_total{reason="api"} 1"#));
    }

    #[tokio::test]
    async fn test_product_totals_scans_full_history() {
        let api = FakeBilling::new(2)
            .with_prices("prod_copy", &["price_pro"])
            .with_charges(charges());
        let (_registry, service) = service(api, 14);

        let totals = service.product_totals("prod_copy").await;
        // 29 + 10 + 10 (ch_5 is outside any window but counts for lifetime)
        assert_eq!(totals.revenue, 49);
        // cus_a twice, cus_b once; cus_c only had a failed charge
        assert_eq!(totals.customers, 2);
    }

    #[tokio::test]
    async fn test_product_totals_on_error() {
        let (_registry, service) = service(FakeBilling::new(10).failing(), 14);
        assert_eq!(
            service.product_totals("prod_copy").await,
            ProductTotals::default()
        );
    }

    #[tokio::test]
    async fn test_site_stats() {
        let api = FakeBilling::new(100)
            .with_prices("prod_copy", &["price_pro"])
            .with_charges(charges());
        let (_registry, service) = service(api, 14);

        let projects: Vec<Project> = serde_json::from_value(json!([
            {"id": "1", "name": "Copy", "tagline": "t", "stripeProductId": "prod_copy",
             "productHuntUrl": "https://www.producthunt.com/products/copy"},
            {"id": "2", "name": "Elsewhere", "tagline": "t", "stripeProductId": "prod_elsewhere"},
            {"id": "3", "name": "Side project", "tagline": "t"}
        ]))
        .unwrap();

        let stats = service.site_stats(&projects).await;
        assert_eq!(
            stats,
            SiteStats {
                total_revenue: 49 + 99,
                project_count: 3,
                launch_count: 1,
                customer_count: 2 + 1,
            }
        );
    }

    #[tokio::test]
    async fn test_site_stats_without_credential() {
        let (_registry, metrics) = metrics();
        let service = RevenueService::new(None, metrics, 14);
        let projects: Vec<Project> = serde_json::from_value(json!([
            {"id": "1", "name": "Copy", "tagline": "t", "stripeProductId": "prod_copy"}
        ]))
        .unwrap();

        let stats = service.site_stats(&projects).await;
        assert_eq!(stats.total_revenue, 0);
        assert_eq!(stats.customer_count, 0);
        assert_eq!(stats.project_count, 1);
    }

    #[test]
    fn test_resolve_days() {
        let (_registry, metrics) = metrics();
        let service = RevenueService::new(None, metrics, 14);
        assert_eq!(service.resolve_days(None), 14);
        assert_eq!(service.resolve_days(Some(0)), 14);
        assert_eq!(service.resolve_days(Some(-3)), 14);
        assert_eq!(service.resolve_days(Some(30)), 30);
        assert_eq!(service.resolve_days(Some(10_000)), 365);
    }
}
