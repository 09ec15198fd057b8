//! Join gateway service: router assembly and serving.

use crate::domain::config::JoinServerConfig;
use crate::domain::error::GatewayError;
use crate::middleware::{create_cors_layer, handle_panic, BodyLimitLayer, JoinMetrics, TracingLayer};
use crate::routes::{
    handle_health, handle_join, handle_metrics, method_not_allowed, not_found, JoinState, OpsState,
};
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use du_01_signed_request::{Clock, SignedRequestApi, SignedRequestValidator, SystemClock};
use du_02_join_orchestrator::{JoinRequestApi, JoinRequestValidator, NoopJoinRequestValidator};
use shared_types::{Chain, ChainRegistry};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::info;

/// The HTTP face of the join server.
pub struct JoinGatewayService {
    config: JoinServerConfig,
    chains: Arc<ChainRegistry>,
    default_chain: Option<Chain>,
    signed_requests: Arc<dyn SignedRequestApi>,
    validator: Arc<dyn JoinRequestValidator>,
    orchestrator: Arc<dyn JoinRequestApi>,
    custom_routes: Router,
    metrics: Arc<JoinMetrics>,
}

impl JoinGatewayService {
    /// Validate `config` and wire the gateway in front of `orchestrator`.
    pub fn new(
        config: JoinServerConfig,
        orchestrator: Arc<dyn JoinRequestApi>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;
        let chains = config.chain_registry()?;
        let default_chain = config.default_chain(&chains)?;

        Ok(Self {
            config,
            chains: Arc::new(chains),
            default_chain,
            signed_requests: Arc::new(SignedRequestValidator::new(Arc::new(SystemClock))),
            validator: Arc::new(NoopJoinRequestValidator),
            orchestrator,
            custom_routes: Router::new(),
            metrics: Arc::new(JoinMetrics::new()),
        })
    }

    /// Deployment-specific admission check run before the orchestrator.
    pub fn with_validator(mut self, validator: Arc<dyn JoinRequestValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Clock used for timestamp freshness.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.signed_requests = Arc::new(SignedRequestValidator::new(clock));
        self
    }

    /// Extra routes served next to the join endpoint. They sit behind the
    /// same middleware, so their panics and oversized bodies get the error
    /// envelope too. Overlapping paths panic at merge time, as in axum.
    pub fn with_routes(mut self, routes: Router) -> Self {
        self.custom_routes = self.custom_routes.merge(routes);
        self
    }

    pub fn config(&self) -> &JoinServerConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<JoinMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Build the full router.
    ///
    /// Layer order (outermost first): Tracing → CatchPanic → Cors → BodyLimit
    pub fn router(&self) -> Router {
        let success_status = if self.config.http.created_status {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };

        let join_state = JoinState {
            signed_requests: Arc::clone(&self.signed_requests),
            tolerance: self.config.limits.signature_tolerance,
            chains: Arc::clone(&self.chains),
            default_chain: self.default_chain.clone(),
            validator: Arc::clone(&self.validator),
            orchestrator: Arc::clone(&self.orchestrator),
            success_status,
            metrics: Arc::clone(&self.metrics),
        };
        let ops_state = OpsState {
            chains: Arc::new(self.chains.names().map(str::to_string).collect()),
            metrics: Arc::clone(&self.metrics),
        };

        let join = Router::new()
            .route(
                &self.config.http.join_path,
                post(handle_join).fallback(method_not_allowed),
            )
            .with_state(join_state);
        let ops = Router::new()
            .route("/health", get(handle_health))
            .route("/metrics", get(handle_metrics))
            .with_state(ops_state);

        join.merge(ops)
            .merge(self.custom_routes.clone())
            .fallback(not_found)
            .layer(BodyLimitLayer::new(
                self.config.limits.max_request_size,
                Arc::clone(&self.metrics),
            ))
            .layer(create_cors_layer(&self.config.cors))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TracingLayer::new())
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        info!(
            addr = %addr,
            join_path = %self.config.http.join_path,
            chains = self.chains.len(),
            "Join server listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Server(e.to_string()))?;

        info!("Join server stopped");
        Ok(())
    }

    /// Bind `http.host:http.port` and serve.
    pub async fn run<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))?;
        self.serve(listener, shutdown).await
    }
}
