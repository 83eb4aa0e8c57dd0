use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{Charge, ErrorEnvelope, ListPage, Price};
use crate::error::StripeError;
use crate::metrics::Metrics;

/// Page size for every list call; Stripe's maximum.
pub const PAGE_LIMIT: u32 = 100;

/// Invoice lines are needed to attribute a charge to a product.
const CHARGE_EXPAND: &str = "data.invoice.lines";

/// Filters for one `GET /v1/charges` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargeQuery {
    /// Only charges created at or after this unix timestamp.
    pub created_gte: Option<i64>,
    pub starting_after: Option<String>,
}

/// The list endpoints revenue aggregation depends on.
#[async_trait]
pub trait BillingApi: Send + Sync {
    async fn list_prices(
        &self,
        product_id: &str,
        starting_after: Option<&str>,
    ) -> Result<ListPage<Price>, StripeError>;

    async fn list_charges(&self, query: &ChargeQuery) -> Result<ListPage<Charge>, StripeError>;
}

pub struct StripeClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: SecretString,
    metrics: Option<Arc<Metrics>>,
}

impl StripeClient {
    pub fn new(base_url: &str, secret_key: SecretString, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("vibe-hub/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> Result<T, StripeError> {
        let started = Instant::now();
        let result = self.get_once(endpoint, query).await;

        if let Some(metrics) = &self.metrics {
            let label = match &result {
                Ok(_) => "success",
                Err(e) => e.reason(),
            };
            metrics.observe_request(endpoint, label, started.elapsed().as_secs_f64());
        }

        result
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> Result<T, StripeError> {
        let url = format!("{}/v1/{}", self.base_url, endpoint);

        debug!(url = %url, query = ?query, "Sending Stripe request");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .query(query)
            .send()
            .await
            .map_err(|source| StripeError::Http { endpoint, source })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| StripeError::Http { endpoint, source })?;

        if !status.is_success() {
            let (message, kind) = match serde_json::from_slice::<ErrorEnvelope>(&body) {
                Ok(envelope) => (
                    envelope
                        .error
                        .message
                        .unwrap_or_else(|| "unknown error".to_string()),
                    envelope.error.kind,
                ),
                Err(_) => (String::from_utf8_lossy(&body).trim().to_string(), None),
            };
            warn!(
                endpoint = endpoint,
                status = %status,
                error_type = kind.as_deref().unwrap_or("unknown"),
                message = %message,
                "Stripe returned error response"
            );
            return Err(StripeError::Api {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| StripeError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl BillingApi for StripeClient {
    async fn list_prices(
        &self,
        product_id: &str,
        starting_after: Option<&str>,
    ) -> Result<ListPage<Price>, StripeError> {
        let mut query = vec![
            ("product", product_id.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
        ];
        if let Some(cursor) = starting_after {
            query.push(("starting_after", cursor.to_string()));
        }
        self.get("prices", &query).await
    }

    async fn list_charges(&self, filter: &ChargeQuery) -> Result<ListPage<Charge>, StripeError> {
        let mut query = vec![("limit", PAGE_LIMIT.to_string())];
        if let Some(gte) = filter.created_gte {
            query.push(("created[gte]", gte.to_string()));
        }
        if let Some(cursor) = &filter.starting_after {
            query.push(("starting_after", cursor.clone()));
        }
        query.push(("expand[]", CHARGE_EXPAND.to_string()));
        self.get("charges", &query).await
    }
}
