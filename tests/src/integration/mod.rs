//! End-to-end flows: a real gateway on `127.0.0.1:0`, driven with reqwest.

pub mod cancellation;
pub mod concurrency;
pub mod join_flow;
pub mod rejections;
