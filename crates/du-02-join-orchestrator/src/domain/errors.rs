//! # Domain Errors
//!
//! [`JoinError`] is what `create()` returns. Adapters and plug-ins report
//! through [`ChainClientError`], [`HookError`] and [`RejectedJoinRequest`];
//! the orchestrator wraps those with the member and data union involved.

use shared_types::{Address, Chain};
use std::time::Duration;
use thiserror::Error;

/// Error category, for callers that branch without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Deployment problem, not the caller's fault
    Configuration,
    /// The data union could not be fetched
    Retrieval,
    /// The member could not be added
    Join,
}

/// Join orchestration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JoinError {
    /// No chain client configured for a chain the registry knows.
    #[error("No chain client configured for chain {chain}")]
    ChainClientMissing { chain: Chain },

    #[error("Error while retrieving data union {data_union} on {chain}: {message}")]
    DataUnionRetrieval {
        data_union: Address,
        chain: Chain,
        message: String,
    },

    #[error("Member {member} is already a member of {data_union}")]
    AlreadyMember { member: Address, data_union: Address },

    #[error("Error while checking membership of {member} in {data_union}: {message}")]
    MembershipCheck {
        member: Address,
        data_union: Address,
        message: String,
    },

    #[error("Error while adding member {member} to {data_union}: {message}")]
    AddMembers {
        member: Address,
        data_union: Address,
        message: String,
    },

    /// Raised after `addMembers` committed.
    #[error("Error while processing join of {member} to {data_union}: {message}")]
    JoinHook {
        member: Address,
        data_union: Address,
        message: String,
    },

    /// The join task panicked or was cancelled by the runtime.
    #[error("Join of {member} to {data_union} was interrupted: {message}")]
    Interrupted {
        member: Address,
        data_union: Address,
        message: String,
    },
}

impl JoinError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JoinError::ChainClientMissing { .. } => ErrorKind::Configuration,
            JoinError::DataUnionRetrieval { .. } => ErrorKind::Retrieval,
            JoinError::AlreadyMember { .. }
            | JoinError::MembershipCheck { .. }
            | JoinError::AddMembers { .. }
            | JoinError::JoinHook { .. }
            | JoinError::Interrupted { .. } => ErrorKind::Join,
        }
    }
}

/// Chain client adapter failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainClientError {
    #[error("Data union not found at {0}")]
    NotFound(Address),

    /// Could not reach the node
    #[error("Transport error: {0}")]
    Transport(String),

    /// Node answered with a JSON-RPC error
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Node answered with something we cannot decode
    #[error("Unexpected RPC response: {0}")]
    InvalidResponse(String),

    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("No receipt for transaction {tx_hash} after {waited:?}")]
    ReceiptTimeout { tx_hash: String, waited: Duration },

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),
}

/// Post-join hook failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct HookError(pub String);

/// A deployment-specific validator refused the join.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct RejectedJoinRequest(pub String);
