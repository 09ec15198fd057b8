//! # Outbound Ports
//!
//! Chain access and the two deployment plug-in points.

use crate::domain::errors::{ChainClientError, HookError, RejectedJoinRequest};
use async_trait::async_trait;
use du_01_signed_request::ValidatedRequest;
use shared_types::{Address, Chain, Hash};
use std::sync::Arc;

/// Chain client - outbound port. One per configured chain.
#[async_trait]
pub trait DataUnionClient: Send + Sync {
    /// Look up a deployed data union.
    async fn get_data_union(
        &self,
        address: &Address,
    ) -> Result<Arc<dyn DataUnionHandle>, ChainClientError>;
}

/// A data union contract on one chain.
#[async_trait]
pub trait DataUnionHandle: Send + Sync {
    fn address(&self) -> Address;

    async fn is_member(&self, member: &Address) -> Result<bool, ChainClientError>;

    /// Submit `addMembers` and wait until it is mined.
    async fn add_members(&self, members: &[Address]) -> Result<TxReceipt, ChainClientError>;
}

/// Mined `addMembers` transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: Hash,
    pub block_number: u64,
}

impl TxReceipt {
    pub fn transaction_hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.transaction_hash))
    }
}

/// Side effect after a member is on-chain (grant stream permissions, send
/// a welcome message, ...). Runs after `addMembers` committed, so it may be
/// invoked again for a member it already processed and must be idempotent.
#[async_trait]
pub trait MemberJoinHook: Send + Sync {
    async fn on_member_join(
        &self,
        member: &Address,
        data_union: &Address,
        chain: &Chain,
    ) -> Result<(), HookError>;
}

/// Hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMemberJoinHook;

#[async_trait]
impl MemberJoinHook for NoopMemberJoinHook {
    async fn on_member_join(
        &self,
        _member: &Address,
        _data_union: &Address,
        _chain: &Chain,
    ) -> Result<(), HookError> {
        Ok(())
    }
}

/// Deployment-specific admission check, run after the request is
/// authenticated and before anything touches a chain. Application fields of
/// the inner request (shared secrets, invite codes) are read here.
#[async_trait]
pub trait JoinRequestValidator: Send + Sync {
    async fn validate(
        &self,
        caller: &Address,
        request: &ValidatedRequest,
    ) -> Result<(), RejectedJoinRequest>;
}

/// Validator that accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopJoinRequestValidator;

#[async_trait]
impl JoinRequestValidator for NoopJoinRequestValidator {
    async fn validate(
        &self,
        _caller: &Address,
        _request: &ValidatedRequest,
    ) -> Result<(), RejectedJoinRequest> {
        Ok(())
    }
}
