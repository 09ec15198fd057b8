//! # Domain Layer
//!
//! Pure signature and request logic with no I/O dependencies.

pub mod ecdsa;
pub mod entities;
pub mod errors;
