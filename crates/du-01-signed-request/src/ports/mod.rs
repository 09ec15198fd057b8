//! # Ports Layer
//!
//! - **Inbound (Driving)**: API the HTTP gateway calls
//! - **Outbound (Driven)**: the wall clock

pub mod inbound;
pub mod outbound;
