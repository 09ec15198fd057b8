//! # DU Telemetry
//!
//! Logging for the join server on top of `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use du_telemetry::{init_telemetry, TelemetryConfig};
//!
//! init_telemetry(&TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DU_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `DU_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |
//! | `DU_CONSOLE_OUTPUT` | `true` | Disable to silence stdout |
//! | `DU_SERVICE_NAME` | `join-server` | Name in the startup log line |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logger: {0}")]
    LoggerInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize telemetry. Fails if a global subscriber is already set.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(config)
}
