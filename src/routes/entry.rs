use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

use super::api;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().merge(api::router(state))
}

/// The router with the error, panic and tracing layers the server runs with.
pub fn app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
}
