use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{
    error::{AppError, INTERNAL_ERROR_MESSAGE},
    logging::panic_message,
};

pub fn catch_panic_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(panic_to_json)
}

fn panic_to_json(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = panic_message(panic.as_ref());

    let client_message = if cfg!(debug_assertions) {
        format!("{INTERNAL_ERROR_MESSAGE}: {details}")
    } else {
        INTERNAL_ERROR_MESSAGE.to_string()
    };

    AppError::internal(client_message).into_response()
}
