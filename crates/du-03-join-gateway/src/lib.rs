// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! DU-03 Join Gateway - HTTP entry point of the join server.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    JOIN GATEWAY (du-03)                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  POST /join      GET /health      GET /metrics   custom ...  │
//! │        │                                                     │
//! │  ┌─────┴──────────────────────────────────────────────┐      │
//! │  │ Tracing → CatchPanic → Cors → BodyLimit            │      │
//! │  └─────┬──────────────────────────────────────────────┘      │
//! │        │                                                     │
//! │  signed request (du-01) → address/chain → validator          │
//! │        │                                                     │
//! │  JoinRequestApi (du-02) → chain client → addMembers          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use du_03_join_gateway::{JoinGatewayService, JoinServerConfig};
//!
//! let gateway = JoinGatewayService::new(config, orchestrator)?;
//! gateway.run(shutdown_signal()).await?;
//! ```
//!
//! # Responses
//!
//! - Success: `200` (or `201` with `http.created_status`) and
//!   `{member, dataUnion, chain}` in canonical form
//! - Any rejection: `400` and `{"error": {"message": ...}}`
//! - Body over `limits.max_request_size`: `413`, same envelope
//! - Panic anywhere below the tracing layer: `500`, same envelope

pub mod domain;
pub mod middleware;
pub mod routes;
pub mod service;

pub use domain::config::{
    ClientConfig, ClientMode, ConfigError, CorsConfig, HttpConfig, JoinServerConfig, LimitsConfig,
};
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use middleware::{JoinMetrics, RejectionStage, RequestId};
pub use service::JoinGatewayService;
