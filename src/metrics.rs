//! Prometheus metrics for Stripe calls and degraded revenue lookups.

use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::Registry;

/// Labels for Stripe request counters.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RequestLabels {
    pub endpoint: String,
    pub result: String,
}

/// Labels for Stripe request latency.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct EndpointLabels {
    pub endpoint: String,
}

/// Labels for lookups that fell back to zero.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct DegradedLabels {
    pub reason: String,
}

const REQUEST_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

pub struct Metrics {
    pub stripe_requests_total: Family<RequestLabels, Counter>,
    pub stripe_request_duration_seconds: Family<EndpointLabels, Histogram>,
    pub revenue_degraded_total: Family<DegradedLabels, Counter>,
}

impl Metrics {
    /// Create and register all metrics with the given registry.
    pub fn new(registry: &mut Registry) -> Self {
        let stripe_requests_total = Family::<RequestLabels, Counter>::default();
        registry.register(
            "vibe_hub_stripe_requests",
            "Total number of Stripe API requests",
            stripe_requests_total.clone(),
        );

        let stripe_request_duration_seconds =
            Family::<EndpointLabels, Histogram>::new_with_constructor(|| {
                Histogram::new(REQUEST_BUCKETS.iter().copied())
            });
        registry.register(
            "vibe_hub_stripe_request_duration_seconds",
            "Duration of Stripe API requests in seconds",
            stripe_request_duration_seconds.clone(),
        );

        let revenue_degraded_total = Family::<DegradedLabels, Counter>::default();
        registry.register(
            "vibe_hub_revenue_degraded",
            "Revenue lookups answered with zeros instead of provider data",
            revenue_degraded_total.clone(),
        );

        Self {
            stripe_requests_total,
            stripe_request_duration_seconds,
            revenue_degraded_total,
        }
    }

    pub fn observe_request(&self, endpoint: &str, result: &str, seconds: f64) {
        self.stripe_requests_total
            .get_or_create(&RequestLabels {
                endpoint: endpoint.to_string(),
                result: result.to_string(),
            })
            .inc();
        self.stripe_request_duration_seconds
            .get_or_create(&EndpointLabels {
                endpoint: endpoint.to_string(),
            })
            .observe(seconds);
    }

    pub fn record_degraded(&self, reason: &str) {
        self.revenue_degraded_total
            .get_or_create(&DegradedLabels {
                reason: reason.to_string(),
            })
            .inc();
    }
}

/// Encode the registry as OpenMetrics text.
pub fn render(registry: &Registry) -> Result<String, std::fmt::Error> {
    let mut buf = String::new();
    encode(&mut buf, registry)?;
    Ok(buf)
}
