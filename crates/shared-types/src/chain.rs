//! # Chains
//!
//! A [`Chain`] is a logical network name ("polygon", "gnosis", ...) that the
//! [`ChainRegistry`] knows how to reach. Names are matched case-insensitively
//! and always render as the lowercase registry key.

use crate::errors::ChainError;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Connection parameters for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// JSON-RPC endpoint.
    pub rpc_url: String,
    /// Gas limit override for `addMembers` (estimated when `None`).
    pub gas_limit: Option<u64>,
    /// Gas price override in wei (queried from the node when `None`).
    pub gas_price: Option<u64>,
    /// Data unions known up front. Only the in-memory client reads this.
    pub data_unions: Vec<String>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 137,
            rpc_url: "http://localhost:8545".to_string(),
            gas_limit: None,
            gas_price: None,
            data_unions: Vec::new(),
        }
    }
}

/// A chain known to the registry.
///
/// Only [`ChainRegistry`] can mint these, so holding one proves the name was
/// configured.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Chain {
    name: String,
}

impl Chain {
    /// Resolve a chain name against `registry`.
    pub fn from_name(name: &str, registry: &ChainRegistry) -> Result<Self, ChainError> {
        registry.resolve(name)
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chain({})", self.name)
    }
}

impl Serialize for Chain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.name)
    }
}

/// Static name → configuration map, keyed by lowercase name.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: BTreeMap<String, ChainConfig>,
}

impl ChainRegistry {
    /// Build a registry. Names are lowercased; two names that collide after
    /// lowercasing are a configuration error.
    pub fn new<I, S>(chains: I) -> Result<Self, ChainError>
    where
        I: IntoIterator<Item = (S, ChainConfig)>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for (name, config) in chains {
            let key = name.as_ref().trim().to_lowercase();
            if key.is_empty() {
                return Err(ChainError::EmptyName);
            }
            if map.insert(key.clone(), config).is_some() {
                return Err(ChainError::Duplicate(key));
            }
        }
        Ok(Self { chains: map })
    }

    /// Resolve a name, case-insensitively.
    pub fn resolve(&self, name: &str) -> Result<Chain, ChainError> {
        let key = name.to_lowercase();
        if self.chains.contains_key(&key) {
            Ok(Chain { name: key })
        } else {
            Err(ChainError::Unknown {
                name: name.to_string(),
                supported: self.names().collect::<Vec<_>>().join(", "),
            })
        }
    }

    /// Resolve a chain out of a JSON field.
    pub fn resolve_json(&self, value: Option<&serde_json::Value>) -> Result<Chain, ChainError> {
        match value {
            Some(serde_json::Value::String(name)) => self.resolve(name),
            Some(serde_json::Value::Null) | None => Err(ChainError::Missing),
            Some(other) => Err(ChainError::NotString(other.to_string())),
        }
    }

    /// Connection parameters for a resolved chain.
    pub fn config(&self, chain: &Chain) -> Option<&ChainConfig> {
        self.chains.get(chain.name())
    }

    /// All resolved chains with their configuration, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (Chain, &ChainConfig)> {
        self.chains
            .iter()
            .map(|(name, config)| (Chain { name: name.clone() }, config))
    }

    /// Registry keys in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
