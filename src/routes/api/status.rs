use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::{services::ServiceContext, state::AppState};

const READY: &str = "ready";
const NO_DATABASE: &str = "no database connection";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/_status", get(status_check))
        .route("/health-check", get(health_check))
        .with_state(state)
}

/// Readiness: 200 while the store answers a ping, 503 otherwise.
async fn status_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<StatusResponse>) {
    let service = ServiceContext::from_state(state.as_ref()).todo();
    if service.is_ready().await {
        (StatusCode::OK, Json(StatusResponse { status: READY }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(StatusResponse {
                status: NO_DATABASE,
            }),
        )
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "hello world",
    })
}
