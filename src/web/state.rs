//! Application state shared across handlers

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use prometheus_client::registry::Registry;

use super::types::ConfigItem;
use crate::catalog::Catalog;
use crate::config::{Config, env};
use crate::revenue::RevenueService;

/// Readiness flag flipped once the listener is bound
#[derive(Default)]
pub struct Readiness(AtomicBool);

impl Readiness {
    pub fn set_ready(&self, ready: bool) {
        self.0.store(ready, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Effective configuration as exposed by `/api/config`, secrets already masked
pub struct ConfigInfo {
    pub items: Vec<ConfigItem>,
}

impl From<&Config> for ConfigInfo {
    fn from(c: &Config) -> Self {
        let catalog = c.catalog_path.as_deref().unwrap_or("builtin");
        let items = vec![
            ConfigItem::public(env::SERVER_PORT, c.server_port),
            ConfigItem::public(env::LOG_LEVEL, &c.log_level),
            ConfigItem::public(env::LOG_FORMAT, &c.log_format),
            ConfigItem::sensitive(
                env::STRIPE_SECRET_KEY,
                c.stripe_secret_key.as_deref().unwrap_or(""),
            ),
            ConfigItem::public(env::STRIPE_API_BASE, &c.stripe_api_base),
            ConfigItem::public(env::STRIPE_TIMEOUT_SECS, c.stripe_timeout_secs),
            ConfigItem::public(env::REVENUE_DAYS, c.revenue_days),
            ConfigItem::public(env::CATALOG_PATH, catalog),
        ];
        Self { items }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub revenue: Arc<RevenueService>,
    pub registry: Arc<Registry>,
    pub config: Arc<ConfigInfo>,
    pub readiness: Arc<Readiness>,
}
