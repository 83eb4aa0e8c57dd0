//! Request and response types for API endpoints

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::catalog::Project;
use crate::revenue::RevenuePoint;

/// Query parameters for the revenue endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct RevenueQuery {
    /// Trailing window in days (default 14, max 365)
    #[param(example = "14")]
    pub days: Option<String>,
    /// Stripe product id; all-zero series when omitted
    #[param(example = "prod_TtUZxA8pNmQQRN")]
    pub product_id: Option<String>,
}

impl RevenueQuery {
    /// Leading integer of `days`, like a lenient `parseInt`.
    pub fn parsed_days(&self) -> Option<i64> {
        let raw = self.days.as_deref()?.trim();
        let (sign, digits) = match raw.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        let digits = &digits[..end];
        if digits.is_empty() {
            return None;
        }
        // An all-digit run can only fail by overflowing
        let n = digits.parse::<i64>().unwrap_or(i64::MAX);
        Some(sign * n)
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// A project together with its trailing daily revenue
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithRevenue {
    #[serde(flatten)]
    pub project: Project,
    pub revenue_data: Vec<RevenuePoint>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectWithRevenue>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub project: ProjectWithRevenue,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueResponse {
    pub revenue_data: Vec<RevenuePoint>,
}

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "Project not found")]
    pub error: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// Version info response (build-time information)
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    #[schema(example = "0.1.0")]
    pub version: String,
    #[schema(example = "abc1234")]
    pub commit: String,
    #[schema(example = "2025-01-11T00:00:00Z")]
    pub build_date: String,
    #[schema(example = "x86_64-unknown-linux-gnu")]
    pub platform: String,
}

/// Single configuration entry
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConfigItem {
    /// Environment variable name
    #[schema(example = "SERVER_PORT")]
    pub env: String,
    /// Current value (masked if sensitive)
    #[schema(example = "3000")]
    pub value: String,
    pub sensitive: bool,
}

impl ConfigItem {
    pub fn public(env: &str, value: impl ToString) -> Self {
        Self {
            env: env.to_string(),
            value: value.to_string(),
            sensitive: false,
        }
    }

    pub fn sensitive(env: &str, value: impl ToString) -> Self {
        Self {
            env: env.to_string(),
            value: Self::mask_value(&value.to_string()),
            sensitive: true,
        }
    }

    fn mask_value(value: &str) -> String {
        match value.chars().count() {
            0 => "(unset)".to_string(),
            1..=4 => "****".to_string(),
            _ => format!("{}****", value.chars().take(2).collect::<String>()),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ConfigResponse {
    pub items: Vec<ConfigItem>,
}
