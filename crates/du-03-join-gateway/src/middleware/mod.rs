//! Middleware stack for the join gateway.
//!
//! Layer order (outermost first): Tracing → CatchPanic → Cors → BodyLimit → Handler

pub mod cors;
pub mod limit;
pub mod metrics;
pub mod panic;
pub mod tracing;

pub use self::cors::create_cors_layer;
pub use self::limit::BodyLimitLayer;
pub use self::metrics::{JoinMetrics, RejectionStage};
pub use self::panic::handle_panic;
pub use self::tracing::{RequestId, TracingLayer, REQUEST_ID_HEADER};
