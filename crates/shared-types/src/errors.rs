//! # Error Types
//!
//! Errors raised while constructing shared value objects.

use thiserror::Error;

/// Errors from [`crate::Address`] construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Missing, non-string, or malformed account identifier.
    #[error("Invalid Ethereum address: {value}")]
    InvalidEthereumAddress {
        /// The offending raw value, rendered as received.
        value: String,
    },
}

/// Errors from [`crate::Chain`] resolution and registry construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// No chain name supplied.
    #[error("Chain name is missing")]
    Missing,

    /// Chain name supplied with a non-string JSON type.
    #[error("Chain name must be a string, got: {0}")]
    NotString(String),

    /// Name not present in the registry.
    #[error("Unknown chain: {name} (supported: {supported})")]
    Unknown {
        /// Name as received.
        name: String,
        /// Comma-separated registry keys.
        supported: String,
    },

    /// Two configured names collapse to the same lowercase key.
    #[error("Duplicate chain in configuration: {0}")]
    Duplicate(String),

    /// Empty chain name in configuration.
    #[error("Chain name in configuration cannot be empty")]
    EmptyName,
}
