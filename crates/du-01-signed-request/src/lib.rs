//! # Signed Request Validation (DU-01)
//!
//! Authenticates join requests before anything touches a chain.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): signature decoding, EIP-191 hashing and
//!   signer recovery, wire entities, errors. No I/O.
//! - **Ports Layer** (`ports/`): the validation API and the clock it reads.
//! - **Service Layer** (`service.rs`): the validator wiring domain to ports.
//!
//! ## Protocol
//!
//! A client signs `request ‖ timestamp` (plain string concatenation) with
//! `personal_sign`. The server recovers the signer, compares it with the
//! claimed `address`, then checks `|now - timestamp| <= tolerance`.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: high-S signatures are rejected
//! - **Replay window**: the timestamp bound applies to past and future alike
//! - Uses the k256 crate for recovery

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::ecdsa::{
    address_from_pubkey, hash_personal_message, recover_address, recover_personal_signer,
    sign_personal_message,
};
pub use domain::entities::{RecoverableSignature, SignedRequest, ValidatedRequest};
pub use domain::errors::{SignatureError, SignedRequestError};
pub use ports::inbound::SignedRequestApi;
pub use ports::outbound::{Clock, FixedClock, SystemClock};
pub use service::{SignedRequestValidator, DEFAULT_TOLERANCE};
