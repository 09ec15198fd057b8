//! # Shared Types Crate
//!
//! Value objects used across the join server.
//!
//! ## Design Principles
//!
//! - **Validate on construction**: an [`Address`] or [`Chain`] that exists is
//!   valid. Raw strings from the wire never travel past the parsing layer.
//! - **Canonical form**: addresses render in EIP-55 checksum case, chains as
//!   their lowercase registry key.
//! - **Immutable registry**: the [`ChainRegistry`] is built once at startup
//!   and shared read-only.

pub mod address;
pub mod chain;
pub mod errors;
pub mod hashing;

pub use address::Address;
pub use chain::{Chain, ChainConfig, ChainRegistry};
pub use errors::*;
pub use hashing::{keccak256, Hash};
