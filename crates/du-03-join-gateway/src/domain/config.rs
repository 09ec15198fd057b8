//! Join server configuration with validation.

use du_02_join_orchestrator::{parse_private_key, RpcClientOptions};
use serde::{Deserialize, Serialize};
use shared_types::{Address, AddressError, Chain, ChainConfig, ChainError, ChainRegistry};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Main join server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinServerConfig {
    pub http: HttpConfig,
    pub limits: LimitsConfig,
    pub cors: CorsConfig,
    /// Chain name → connection parameters. Names are case-insensitive.
    pub chains: BTreeMap<String, ChainConfig>,
    /// Chain used when a join request has no `chain` field
    pub default_chain: Option<String>,
    pub client: ClientConfig,
}

impl Default for JoinServerConfig {
    fn default() -> Self {
        let mut chains = BTreeMap::new();
        chains.insert("polygon".to_string(), ChainConfig::default());
        Self {
            http: HttpConfig::default(),
            limits: LimitsConfig::default(),
            cors: CorsConfig::default(),
            chains,
            default_chain: None,
            client: ClientConfig::default(),
        }
    }
}

impl JoinServerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }
        if self.limits.signature_tolerance.is_zero() {
            return Err(ConfigError::InvalidLimit(
                "signature_tolerance cannot be 0".into(),
            ));
        }

        let path = &self.http.join_path;
        if !path.starts_with('/') || path.len() < 2 {
            return Err(ConfigError::InvalidPath(format!(
                "join_path must start with '/' and name a route, got {path:?}"
            )));
        }
        if path == "/health" || path == "/metrics" {
            return Err(ConfigError::InvalidPath(format!(
                "join_path {path} collides with a built-in route"
            )));
        }

        let registry = self.chain_registry()?;
        if registry.is_empty() {
            return Err(ConfigError::NoChains);
        }
        self.default_chain(&registry)?;

        for (name, chain) in &self.chains {
            if chain.rpc_url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("chain {name}: rpc_url is empty")));
            }
            for data_union in &chain.data_unions {
                Address::parse(data_union).map_err(|source| ConfigError::InvalidDataUnion {
                    chain: name.clone(),
                    source,
                })?;
            }
        }

        if self.client.mode == ClientMode::Rpc {
            let key = self
                .client
                .private_key
                .as_deref()
                .ok_or(ConfigError::MissingPrivateKey)?;
            parse_private_key(key).map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?;
            if self.client.poll_interval.is_zero() {
                return Err(ConfigError::InvalidTimeout(
                    "poll_interval cannot be 0".into(),
                ));
            }
        }

        Ok(())
    }

    /// Build the chain registry from `chains`.
    pub fn chain_registry(&self) -> Result<ChainRegistry, ConfigError> {
        Ok(ChainRegistry::new(
            self.chains
                .iter()
                .map(|(name, config)| (name.as_str(), config.clone())),
        )?)
    }

    /// Resolve `default_chain` against `registry`.
    pub fn default_chain(&self, registry: &ChainRegistry) -> Result<Option<Chain>, ConfigError> {
        self.default_chain
            .as_deref()
            .map(|name| registry.resolve(name))
            .transpose()
            .map_err(ConfigError::from)
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 5555)
    pub port: u16,
    /// Route of the join endpoint
    pub join_path: String,
    /// Answer successful joins with 201 instead of 200
    pub created_status: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 5555,
            join_path: "/join".to_string(),
            created_status: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Bytes; larger bodies get 413
    pub max_request_size: usize,
    /// Accepted distance between a request's timestamp and server time
    #[serde(with = "humantime_serde")]
    pub signature_tolerance: Duration,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 16 * 1024,
            signature_tolerance: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string(), "X-Request-Id".to_string()],
            max_age: 86400, // 24 hours
        }
    }
}

/// Which chain client backs every configured chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientMode {
    /// Process-local ledger seeded from `chains.*.data_unions`
    InMemory,
    /// Ethereum JSON-RPC at `chains.*.rpc_url`
    Rpc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub mode: ClientMode,
    /// Join-part agent key (hex). Prefer `DU_PRIVATE_KEY` over the file.
    #[serde(skip_serializing)]
    pub private_key: Option<String>,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub receipt_timeout: Duration,
    pub gas_limit_margin_percent: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let rpc = RpcClientOptions::default();
        Self {
            mode: ClientMode::InMemory,
            private_key: None,
            request_timeout: rpc.request_timeout,
            poll_interval: rpc.poll_interval,
            receipt_timeout: rpc.receipt_timeout,
            gas_limit_margin_percent: rpc.gas_limit_margin_percent,
        }
    }
}

impl ClientConfig {
    pub fn rpc_options(&self) -> RpcClientOptions {
        RpcClientOptions {
            request_timeout: self.request_timeout,
            poll_interval: self.poll_interval,
            receipt_timeout: self.receipt_timeout,
            gas_limit_margin_percent: self.gas_limit_margin_percent,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("no chains configured")]
    NoChains,
    #[error("invalid chain configuration: {0}")]
    Chain(#[from] ChainError),
    #[error("chain {chain}: invalid data union: {source}")]
    InvalidDataUnion {
        chain: String,
        #[source]
        source: AddressError,
    },
    #[error("client mode 'rpc' requires a private key")]
    MissingPrivateKey,
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}ms", duration.as_millis()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        let number = |digits: &str| digits.trim().parse::<u64>();
        if let Some(ms) = s.strip_suffix("ms") {
            number(ms)
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            number(secs)
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            number(mins)
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| "invalid minutes")
        } else if let Some(hours) = s.strip_suffix('h') {
            number(hours)
                .map(|h| Duration::from_secs(h * 3600))
                .map_err(|_| "invalid hours")
        } else {
            number(s)
                .map(Duration::from_secs)
                .map_err(|_| "expected a duration like 500ms, 30s, 5m or 1h")
        }
    }
}
