use clap::{Parser, Subcommand};
use secrecy::SecretString;

// ============================================
// Environment variable name constants
// These are shared between config parsing and API exposure
// ============================================
pub mod env {
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const SERVER_PORT: &str = "SERVER_PORT";
    pub const STRIPE_SECRET_KEY: &str = "STRIPE_SECRET_KEY";
    pub const STRIPE_API_BASE: &str = "STRIPE_API_BASE";
    pub const STRIPE_TIMEOUT_SECS: &str = "STRIPE_TIMEOUT_SECS";
    pub const REVENUE_DAYS: &str = "REVENUE_DAYS";
    pub const CATALOG_PATH: &str = "CATALOG_PATH";
}

/// Upper bound for any trailing revenue window, in days.
pub const MAX_REVENUE_DAYS: u32 = 365;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show version information
    Version,
}

#[derive(Parser, Clone)]
#[command(
    name = "vibe-hub",
    version,
    about = "Portfolio revenue API backed by Stripe",
    long_about = "Serves the Vibe Coder Hub project catalog together with per-product revenue aggregated from Stripe charge history."
)]
pub struct Config {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Log format: json or pretty
    #[arg(long, env = env::LOG_FORMAT, default_value = "json")]
    pub log_format: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = env::LOG_LEVEL, default_value = "info")]
    pub log_level: String,

    /// API server port
    #[arg(long, env = env::SERVER_PORT, default_value = "3000")]
    pub server_port: u16,

    /// Stripe secret key (revenue degrades to zero when unset)
    #[arg(long, env = env::STRIPE_SECRET_KEY, hide_env_values = true)]
    pub stripe_secret_key: Option<String>,

    /// Stripe API base URL
    #[arg(long, env = env::STRIPE_API_BASE, default_value = "https://api.stripe.com")]
    pub stripe_api_base: String,

    /// Timeout for a single Stripe request in seconds
    #[arg(long, env = env::STRIPE_TIMEOUT_SECS, default_value = "30")]
    pub stripe_timeout_secs: u64,

    /// Default trailing window for daily revenue, in days
    #[arg(long, env = env::REVENUE_DAYS, default_value = "14")]
    pub revenue_days: u32,

    /// Path to a YAML project catalog (built-in catalog when unset)
    #[arg(long, env = env::CATALOG_PATH)]
    pub catalog_path: Option<String>,
}

impl Config {
    pub fn from_args() -> Self {
        Config::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.revenue_days == 0 || self.revenue_days > MAX_REVENUE_DAYS {
            return Err(format!(
                "REVENUE_DAYS must be between 1 and {}",
                MAX_REVENUE_DAYS
            ));
        }
        if self.stripe_api_base.trim().is_empty() {
            return Err("STRIPE_API_BASE must not be empty".to_string());
        }
        if self.stripe_timeout_secs == 0 {
            return Err("STRIPE_TIMEOUT_SECS must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Stripe key wrapped as a secret; empty values count as absent.
    pub fn stripe_secret(&self) -> Option<SecretString> {
        self.stripe_secret_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::from(key.to_string()))
    }
}

// Debug is written by hand so the Stripe key is never printed.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("command", &self.command)
            .field("log_format", &self.log_format)
            .field("log_level", &self.log_level)
            .field("server_port", &self.server_port)
            .field(
                "stripe_secret_key",
                &self.stripe_secret_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("stripe_api_base", &self.stripe_api_base)
            .field("stripe_timeout_secs", &self.stripe_timeout_secs)
            .field("revenue_days", &self.revenue_days)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        command: None,
        log_format: "json".to_string(),
        log_level: "info".to_string(),
        server_port: 3000,
        stripe_secret_key: None,
        stripe_api_base: "https://api.stripe.com".to_string(),
        stripe_timeout_secs: 30,
        revenue_days: 14,
        catalog_path: None,
    }
}
