//! HTTP server for profile aggregation
//!
//! # Routes
//!
//! - `GET /profile?github_org=<org>&bitbucket_org=<org>` - merged profile
//!   summary for the two organization handles; both parameters required
//! - `GET /health` - liveness probe

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::error::ProfileError;
use crate::profile::ProfileService;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters for the profile endpoint; both are required
#[derive(Debug, Deserialize)]
pub struct ProfileParams {
    #[serde(default)]
    github_org: Option<String>,
    #[serde(default)]
    bitbucket_org: Option<String>,
}

/// Shared server state
struct AppState {
    service: ProfileService,
}

/// HTTP server wrapping a [`ProfileService`]
pub struct ProfileServer {
    state: Arc<AppState>,
}

impl ProfileServer {
    pub fn new(service: ProfileService) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Build the router
    fn router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/profile", get(profile))
            .route("/health", get(health))
            .with_state(state)
    }

    /// Run the server on the given address
    pub async fn run(self, addr: &str) -> crate::Result<()> {
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(addr, "Profile server listening");

        axum::serve(listener, Self::router(self.state)).await?;
        Ok(())
    }
}

async fn health() -> impl IntoResponse {
    tracing::info!("Health check");
    Json(serde_json::json!({ "status": "ok" }))
}

async fn profile(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProfileParams>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let github_org = params.github_org.ok_or_else(|| missing_param("github_org"))?;
    let bitbucket_org = params
        .bitbucket_org
        .ok_or_else(|| missing_param("bitbucket_org"))?;

    let summary = state
        .service
        .build_profile(&github_org, &bitbucket_org)
        .await
        .map_err(error_response)?;

    Ok(Json(summary))
}

fn missing_param(name: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: format!("{} is a required query parameter", name),
        }),
    )
}

/// Map a core failure onto a response: upstream failures mirror the
/// upstream status code, everything else is a plain 500.
fn error_response(error: ProfileError) -> (StatusCode, Json<ErrorResponse>) {
    let status = error
        .upstream_status()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    tracing::warn!(status = %status, error = %error, "Profile build failed");

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}
