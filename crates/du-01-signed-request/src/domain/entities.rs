//! # Domain Entities
//!
//! The wire-level signed request, its decoded signature, and the validated
//! request handed to the rest of the join flow.

use super::errors::SignatureError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared_types::Address;

/// A signed request as it arrives over HTTP.
///
/// Every field is optional at this level so the validator can name whichever
/// one is missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignedRequest {
    /// Claimed signer
    pub address: Option<String>,
    /// JSON-encoded inner request
    pub request: Option<String>,
    /// ISO 8601 / RFC 3339 signing time
    pub timestamp: Option<String>,
    /// 65-byte `r ‖ s ‖ v` signature, hex
    pub signature: Option<String>,
}

impl SignedRequest {
    /// The exact bytes the client signed: `request ‖ timestamp`.
    pub fn signing_payload(request: &str, timestamp: &str) -> String {
        let mut payload = String::with_capacity(request.len() + timestamp.len());
        payload.push_str(request);
        payload.push_str(timestamp);
        payload
    }
}

/// Recoverable ECDSA signature on secp256k1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

impl RecoverableSignature {
    /// Decode `r ‖ s ‖ v` from hex, with or without a `0x` prefix.
    pub fn from_hex(value: &str) -> Result<Self, SignatureError> {
        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);
        let bytes =
            hex::decode(digits).map_err(|e| SignatureError::InvalidFormat(e.to_string()))?;
        if bytes.len() != 65 {
            return Err(SignatureError::InvalidFormat(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }

    /// `0x`-prefixed hex of `r ‖ s ‖ v`.
    pub fn to_hex(&self) -> String {
        let mut bytes = Vec::with_capacity(65);
        bytes.extend_from_slice(&self.r);
        bytes.extend_from_slice(&self.s);
        bytes.push(self.v);
        format!("0x{}", hex::encode(bytes))
    }
}

/// The inner request after authentication, augmented with the caller's
/// canonical `address`.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedRequest {
    caller: Address,
    body: Map<String, Value>,
}

impl ValidatedRequest {
    /// Wrap a parsed request body. Any `address` field the client put in the
    /// body is overwritten with the authenticated caller.
    pub fn new(caller: Address, mut body: Map<String, Value>) -> Self {
        body.insert("address".to_string(), Value::String(caller.to_string()));
        Self { caller, body }
    }

    /// The authenticated signer.
    pub fn caller(&self) -> &Address {
        &self.caller
    }

    /// Look up a field of the inner request.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    /// The `dataUnion` field, unparsed.
    pub fn data_union(&self) -> Option<&Value> {
        self.get("dataUnion")
    }

    /// The `chain` field, unparsed.
    pub fn chain(&self) -> Option<&Value> {
        self.get("chain")
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }
}
