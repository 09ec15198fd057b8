//! # Inbound Ports
//!
//! What the HTTP layer calls once a request is authenticated and parsed.

use crate::domain::entities::JoinRequest;
use crate::domain::errors::JoinError;
use async_trait::async_trait;
use shared_types::{Address, Chain};

#[async_trait]
pub trait JoinRequestApi: Send + Sync {
    /// Add `member` to `data_union` on `chain`, then run the post-join hook.
    ///
    /// Fails with [`JoinError::AlreadyMember`] without touching the chain
    /// when the member is already in.
    async fn create(
        &self,
        member: Address,
        data_union: Address,
        chain: Chain,
    ) -> Result<JoinRequest, JoinError>;
}
