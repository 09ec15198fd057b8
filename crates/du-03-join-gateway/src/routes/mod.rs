//! HTTP handlers.

pub mod health;
pub mod join;

pub use health::{handle_health, handle_metrics, method_not_allowed, not_found, OpsState};
pub use join::{handle_join, JoinState};
