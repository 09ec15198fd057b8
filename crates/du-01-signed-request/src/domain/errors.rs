//! # Signed Request Errors
//!
//! Two levels: [`SignatureError`] describes why a signature could not be
//! decoded or recovered, [`SignedRequestError`] is what callers of the
//! validator see.

use thiserror::Error;

/// Low-level signature decoding and recovery failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// Not hex, or not 65 bytes
    #[error("Invalid signature format: {0}")]
    InvalidFormat(String),

    /// R or S outside [1, n-1]
    #[error("Signature scalar out of range")]
    ScalarOutOfRange,

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28)
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Signing failed (client-side helper only)
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

/// Errors returned by the signed-request validator.
///
/// The three kinds are distinguishable for programmatic consumers; the HTTP
/// layer renders all of them the same way.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignedRequestError {
    /// Missing signature/address, undecodable signature, or signer mismatch.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Missing, unparseable, or out-of-window timestamp.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Authentic request whose payload is not a JSON object.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

impl From<SignatureError> for SignedRequestError {
    fn from(e: SignatureError) -> Self {
        SignedRequestError::InvalidSignature(e.to_string())
    }
}
