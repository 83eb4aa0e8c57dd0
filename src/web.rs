//! Web layer for vibe-hub
//!
//! # Module Structure
//! - `handlers`: HTTP request handlers
//! - `state`: Application state and readiness
//! - `types`: Request and response types

mod handlers;
mod state;
mod types;

pub use handlers::{
    get_config, get_project, get_revenue, get_stats, get_version, healthz, list_projects,
    metrics, readyz,
};
pub use state::{AppState, ConfigInfo, Readiness};
pub use types::{
    ConfigItem, ConfigResponse, ErrorResponse, HealthResponse, ProjectListResponse,
    ProjectResponse, ProjectWithRevenue, RevenueQuery, RevenueResponse, VersionResponse,
};

use axum::{
    Router,
    http::{Method, header},
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

use crate::catalog::Project;
use crate::revenue::{RevenuePoint, SiteStats};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vibe Coder Hub API",
        description = "Portfolio projects with revenue aggregated from Stripe",
        version = env!("CARGO_PKG_VERSION"),
        license(name = "MIT")
    ),
    paths(
        handlers::healthz,
        handlers::readyz,
        handlers::list_projects,
        handlers::get_project,
        handlers::get_stats,
        handlers::get_revenue,
        handlers::get_version,
        handlers::get_config,
    ),
    components(schemas(
        HealthResponse,
        ErrorResponse,
        Project,
        RevenuePoint,
        ProjectWithRevenue,
        ProjectListResponse,
        ProjectResponse,
        RevenueResponse,
        SiteStats,
        VersionResponse,
        ConfigItem,
        ConfigResponse,
    )),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Projects", description = "Portfolio projects with revenue"),
        (name = "Statistics", description = "Site-wide statistics"),
        (name = "Revenue", description = "Daily revenue series"),
        (name = "Version", description = "Build version information"),
        (name = "Config", description = "Effective configuration"),
    )
)]
pub struct ApiDoc;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/{id}", get(get_project))
        .route("/api/stats", get(get_stats))
        .route("/api/revenue", get(get_revenue))
        .route("/api/version", get(get_version))
        .route("/api/config", get(get_config))
        .route("/api-docs/openapi.json", get(serve_openapi))
        .layer(cors)
        .with_state(state)
}

async fn serve_openapi() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        ApiDoc::openapi().to_json().unwrap_or_default(),
    )
}
