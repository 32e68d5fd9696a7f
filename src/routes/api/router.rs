use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{status, todos};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(status::router(state.clone()))
        .merge(todos::router(state))
}
