//! # Join Server Test Suite
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Spawned server, request signer
//! └── integration/      # End-to-end flows over real HTTP
//!     ├── join_flow.rs
//!     ├── rejections.rs
//!     └── concurrency.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p du-tests
//! cargo test -p du-tests integration::rejections
//! ```

pub mod fixtures;
pub mod integration;
