//! HTTP request handlers for API endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use futures::future::join_all;
use tracing::{debug, error};

use crate::catalog::Project;
use crate::revenue::SiteStats;

use super::state::AppState;
use super::types::{
    ConfigResponse, ErrorResponse, HealthResponse, ProjectListResponse, ProjectResponse,
    ProjectWithRevenue, RevenueQuery, RevenueResponse, VersionResponse,
};

async fn with_revenue(state: &AppState, project: Project) -> ProjectWithRevenue {
    let days = state.revenue.default_days();
    let revenue_data = state
        .revenue
        .daily_revenue(project.stripe_product_id.as_deref(), days)
        .await;
    ProjectWithRevenue {
        project,
        revenue_data,
    }
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
}

/// Readiness probe
#[utoipa::path(
    get,
    path = "/readyz",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Service is not ready yet", body = HealthResponse)
    )
)]
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.readiness.is_ready() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "not ready".to_string(),
            }),
        )
    }
}

/// List all projects with their trailing daily revenue
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Projects with revenue", body = ProjectListResponse)
    )
)]
pub async fn list_projects(State(state): State<AppState>) -> impl IntoResponse {
    let projects = state.catalog.projects().to_vec();
    debug!(projects = projects.len(), "Listing projects");

    // One independent revenue scan per project, awaited together
    let projects = join_all(
        projects
            .into_iter()
            .map(|project| with_revenue(&state, project)),
    )
    .await;

    (StatusCode::OK, Json(ProjectListResponse { projects }))
}

/// Get a single project with its trailing daily revenue
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(
        ("id" = String, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Project with revenue", body = ProjectResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Some(project) = state.catalog.get(&id).cloned() else {
        debug!(id = %id, "Project not found");
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Project not found".to_string(),
            }),
        )
            .into_response();
    };

    let project = with_revenue(&state, project).await;
    (StatusCode::OK, Json(ProjectResponse { project })).into_response()
}

/// Site-wide revenue, customer and launch counts
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Statistics",
    responses(
        (status = 200, description = "Site statistics", body = SiteStats)
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.revenue.site_stats(state.catalog.projects()).await;
    (StatusCode::OK, Json(stats))
}

/// Daily revenue for one product over a trailing window
#[utoipa::path(
    get,
    path = "/api/revenue",
    tag = "Revenue",
    params(RevenueQuery),
    responses(
        (status = 200, description = "Daily revenue series", body = RevenueResponse)
    )
)]
pub async fn get_revenue(
    State(state): State<AppState>,
    Query(query): Query<RevenueQuery>,
) -> impl IntoResponse {
    let days = state.revenue.resolve_days(query.parsed_days());
    let revenue_data = state
        .revenue
        .daily_revenue(query.product_id(), days)
        .await;
    (StatusCode::OK, Json(RevenueResponse { revenue_data }))
}

/// Build information
#[utoipa::path(
    get,
    path = "/api/version",
    tag = "Version",
    responses(
        (status = 200, description = "Build information", body = VersionResponse)
    )
)]
pub async fn get_version() -> impl IntoResponse {
    let version = VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: env!("VERGEN_GIT_SHA").to_string(),
        build_date: env!("VERGEN_BUILD_TIMESTAMP").to_string(),
        platform: env!("VERGEN_CARGO_TARGET_TRIPLE").to_string(),
    };
    (StatusCode::OK, Json(version))
}

/// Effective configuration with secrets masked
#[utoipa::path(
    get,
    path = "/api/config",
    tag = "Config",
    responses(
        (status = 200, description = "Configuration items", body = ConfigResponse)
    )
)]
pub async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ConfigResponse {
            items: state.config.items.clone(),
        }),
    )
}

/// Prometheus metrics in OpenMetrics text format
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match crate::metrics::render(&state.registry) {
        Ok(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "application/openmetrics-text; version=1.0.0; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
        }
    }
}
