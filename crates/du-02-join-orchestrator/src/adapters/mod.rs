//! Chain client adapters.
//!
//! - [`in_memory`]: process-local ledger for development and tests.
//! - [`rpc`]: alloy HTTP provider, signs `addMembers` with the join-part agent key.

pub mod in_memory;
pub mod rpc;
