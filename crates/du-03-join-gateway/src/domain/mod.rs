pub mod config;
pub mod error;

pub use config::{
    ClientConfig, ClientMode, ConfigError, CorsConfig, HttpConfig, JoinServerConfig, LimitsConfig,
};
pub use error::{ApiError, ApiResult, GatewayError};
