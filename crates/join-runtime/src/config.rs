//! # Configuration Loading
//!
//! Defaults, then the TOML file named by `DU_CONFIG`, then environment
//! overrides. The result is validated before anything is built.
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `DU_CONFIG` | path of the TOML file |
//! | `DU_HTTP_HOST` | `http.host` |
//! | `DU_HTTP_PORT` | `http.port` |
//! | `DU_PRIVATE_KEY` | `client.private_key` |
//! | `DU_DEFAULT_CHAIN` | `default_chain` |

use anyhow::{Context, Result};
use du_03_join_gateway::JoinServerConfig;
use std::path::Path;
use tracing::info;

/// Load configuration from the process environment.
pub fn load_config() -> Result<JoinServerConfig> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration reading variables through `lookup`.
pub fn load_config_from<F>(lookup: F) -> Result<JoinServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup("DU_CONFIG") {
        Some(path) => read_config_file(Path::new(&path))?,
        None => {
            info!("DU_CONFIG not set, using built-in defaults");
            JoinServerConfig::default()
        }
    };

    apply_env_overrides(&mut config, &lookup)?;

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Parse a TOML configuration file.
pub fn read_config_file(path: &Path) -> Result<JoinServerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: JoinServerConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    info!(path = %path.display(), "Loaded configuration file");
    Ok(config)
}

fn apply_env_overrides<F>(config: &mut JoinServerConfig, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("DU_HTTP_HOST") {
        config.http.host = host
            .parse()
            .with_context(|| format!("DU_HTTP_HOST is not an IP address: {host}"))?;
    }
    if let Some(port) = lookup("DU_HTTP_PORT") {
        config.http.port = port
            .parse()
            .with_context(|| format!("DU_HTTP_PORT is not a port number: {port}"))?;
    }
    if let Some(key) = lookup("DU_PRIVATE_KEY") {
        config.client.private_key = Some(key);
        info!("Loaded join-part agent key from environment");
    }
    if let Some(chain) = lookup("DU_DEFAULT_CHAIN") {
        config.default_chain = Some(chain);
    }
    Ok(())
}
