//! # Account Address
//!
//! A 20-byte Ethereum account identifier.
//!
//! ## Encodings
//!
//! - Input: `0x` (or `0X`) followed by exactly 40 hex digits, any case.
//! - Canonical output: EIP-55 mixed-case checksum, e.g.
//!   `0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed`.
//! - ABI/RPC: [`Address::to_lower_hex`] and [`Address::as_bytes`].

use crate::errors::AddressError;
use crate::hashing::keccak256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Validated account address. Equality and hashing are over the raw bytes,
/// which is equivalent to comparing canonical strings.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Parse an address string.
    ///
    /// Fails with [`AddressError::InvalidEthereumAddress`] unless `value` is a
    /// `0x`-prefixed string of 40 hex digits.
    pub fn parse(value: &str) -> Result<Self, AddressError> {
        let invalid = || AddressError::InvalidEthereumAddress {
            value: value.to_string(),
        };

        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .ok_or_else(invalid)?;

        if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }

    /// Parse an address out of a JSON field.
    ///
    /// `None` (field absent) and non-string values are rejected the same way
    /// a malformed string is, with the raw value carried in the error.
    pub fn from_json(value: Option<&serde_json::Value>) -> Result<Self, AddressError> {
        match value {
            Some(serde_json::Value::String(s)) => Self::parse(s),
            Some(other) => Err(AddressError::InvalidEthereumAddress {
                value: other.to_string(),
            }),
            None => Err(AddressError::InvalidEthereumAddress {
                value: "undefined".to_string(),
            }),
        }
    }

    /// Wrap raw bytes (e.g. an address recovered from a signature).
    #[inline]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Borrow the underlying 20 bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_lower_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 checksum encoding.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl AsRef<[u8]> for Address {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}
