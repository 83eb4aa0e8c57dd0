use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::metrics::Metrics;
use crate::revenue::RevenueService;
use crate::stripe::{BillingApi, StripeClient};
use crate::web::{self, AppState, ConfigInfo, Readiness};

/// Assemble application state from configuration.
pub fn build_state(config: &Config) -> Result<AppState> {
    let catalog = Catalog::load_or_builtin(config.catalog_path.as_deref())
        .context("Failed to load project catalog")?;

    let mut registry = Registry::default();
    let metrics = Arc::new(Metrics::new(&mut registry));

    let api: Option<Arc<dyn BillingApi>> = match config.stripe_secret() {
        Some(secret) => {
            let client = StripeClient::new(
                &config.stripe_api_base,
                secret,
                config.stripe_timeout_secs,
            )?
            .with_metrics(metrics.clone());
            info!(api_base = %client.base_url(), "Stripe client configured");
            let client: Arc<dyn BillingApi> = Arc::new(client);
            Some(client)
        }
        None => {
            warn!("STRIPE_SECRET_KEY not set - revenue will be reported as zero");
            None
        }
    };

    let revenue = RevenueService::new(api, metrics, config.revenue_days);

    Ok(AppState {
        catalog: Arc::new(catalog),
        revenue: Arc::new(revenue),
        registry: Arc::new(registry),
        config: Arc::new(ConfigInfo::from(config)),
        readiness: Arc::new(Readiness::default()),
    })
}

pub async fn run(config: Config, mut shutdown: tokio::sync::watch::Receiver<bool>) -> Result<()> {
    let state = build_state(&config)?;
    let readiness = state.readiness.clone();

    info!(
        port = config.server_port,
        projects = state.catalog.len(),
        stripe_connected = state.revenue.is_connected(),
        revenue_days = state.revenue.default_days(),
        "Starting API server"
    );

    let app = web::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(addr = %addr, "Server listening");
    readiness.set_ready(true);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
            info!("Server shutting down");
        })
        .await?;

    readiness.set_ready(false);
    Ok(())
}
