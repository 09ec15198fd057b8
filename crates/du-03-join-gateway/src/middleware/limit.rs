//! Request body size limit.
//!
//! Oversized bodies are answered with 413 and the error envelope before any
//! handler runs.

use super::metrics::JoinMetrics;
use crate::ApiError;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_LENGTH, Request},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::warn;

#[derive(Clone)]
pub struct BodyLimitLayer {
    max_request_size: usize,
    metrics: Arc<JoinMetrics>,
}

impl BodyLimitLayer {
    pub fn new(max_request_size: usize, metrics: Arc<JoinMetrics>) -> Self {
        Self {
            max_request_size,
            metrics,
        }
    }
}

impl<S> Layer<S> for BodyLimitLayer {
    type Service = BodyLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BodyLimitService {
            inner,
            max_request_size: self.max_request_size,
            metrics: Arc::clone(&self.metrics),
        }
    }
}

#[derive(Clone)]
pub struct BodyLimitService<S> {
    inner: S,
    max_request_size: usize,
    metrics: Arc<JoinMetrics>,
}

impl<S> BodyLimitService<S> {
    fn reject(&self, size: Option<usize>) -> Response {
        warn!(size, max = self.max_request_size, "Request too large");
        self.metrics.record_payload_too_large();
        ApiError::payload_too_large(self.max_request_size).into_response()
    }
}

impl<S> Service<Request<Body>> for BodyLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let this = self.clone();
        // Drive the service that was polled ready; leave the clone for the next call.
        let mut inner = std::mem::replace(&mut self.inner, this.inner.clone());

        Box::pin(async move {
            let declared = req
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<usize>().ok());
            if let Some(len) = declared {
                if len > this.max_request_size {
                    return Ok(this.reject(Some(len)));
                }
            }

            // Chunked bodies carry no length; read up to the limit.
            let (parts, body) = req.into_parts();
            let bytes = match to_bytes(body, this.max_request_size).await {
                Ok(bytes) => bytes,
                Err(_) => return Ok(this.reject(None)),
            };

            inner.call(Request::from_parts(parts, Body::from(bytes))).await
        })
    }
}
