//! Panics in handlers become a 500 envelope.

use crate::ApiError;
use axum::{
    body::Body,
    http::Response,
    response::IntoResponse,
};
use std::any::Any;
use tracing::error;

/// Response for `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "Handler panicked");
    ApiError::internal().into_response()
}
