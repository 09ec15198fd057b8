//! # Data Union Join Server Runtime
//!
//! Library half of the `join-server` binary.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (`DU_LOG_LEVEL`, `DU_JSON_LOGS`)
//! 2. Load configuration (defaults → `DU_CONFIG` file → environment)
//! 3. Validate configuration; any error aborts startup
//! 4. Build one chain client per configured chain
//! 5. Build the join orchestrator and the HTTP gateway
//! 6. Serve until Ctrl-C, then drain in-flight requests

pub mod config;
pub mod wiring;

pub use config::{load_config, load_config_from, read_config_file};
pub use wiring::{build_chain_clients, build_gateway, build_gateway_with_hook};
