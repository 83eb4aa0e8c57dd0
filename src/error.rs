//! Error types for the Stripe client and the project catalog.

use thiserror::Error;

/// Errors returned by calls against the Stripe REST API.
#[derive(Error, Debug)]
pub enum StripeError {
    #[error("Stripe secret key is not configured")]
    MissingCredential,

    #[error("[{endpoint}] request failed: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("[{endpoint}] Stripe returned status {status}: {message}")]
    Api {
        endpoint: &'static str,
        status: u16,
        message: String,
    },

    #[error("[{endpoint}] failed to decode response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

impl StripeError {
    /// Short label used for metrics and logs.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Http { .. } => "http",
            Self::Api { .. } => "api",
            Self::Decode { .. } => "decode",
        }
    }
}

/// Errors raised while loading the project catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}
