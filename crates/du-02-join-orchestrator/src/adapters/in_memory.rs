//! In-Memory Chain Client Adapter
//!
//! Implements [`DataUnionClient`] with a process-local ledger. Used by the
//! development server and tests; nothing is persisted.

use crate::domain::errors::ChainClientError;
use crate::ports::outbound::{DataUnionClient, DataUnionHandle, TxReceipt};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{keccak256, Address};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// One simulated data union contract.
#[derive(Debug)]
pub struct InMemoryDataUnion {
    address: Address,
    members: RwLock<BTreeSet<Address>>,
    block_number: AtomicU64,
}

impl InMemoryDataUnion {
    fn new(address: Address) -> Self {
        Self {
            address,
            members: RwLock::new(BTreeSet::new()),
            block_number: AtomicU64::new(0),
        }
    }

    /// Current members, in address order.
    pub fn members(&self) -> Vec<Address> {
        self.members.read().iter().copied().collect()
    }
}

#[async_trait]
impl DataUnionHandle for InMemoryDataUnion {
    fn address(&self) -> Address {
        self.address
    }

    async fn is_member(&self, member: &Address) -> Result<bool, ChainClientError> {
        Ok(self.members.read().contains(member))
    }

    /// Reverts, like the contract does, when any member is already in.
    async fn add_members(&self, members: &[Address]) -> Result<TxReceipt, ChainClientError> {
        let block_number = self.block_number.fetch_add(1, Ordering::SeqCst) + 1;

        let mut preimage = Vec::with_capacity(28 + 20 * members.len());
        preimage.extend_from_slice(self.address.as_bytes());
        preimage.extend_from_slice(&block_number.to_be_bytes());
        for member in members {
            preimage.extend_from_slice(member.as_bytes());
        }
        let transaction_hash = keccak256(&preimage);

        let mut current = self.members.write();
        if members.iter().any(|m| current.contains(m)) {
            return Err(ChainClientError::Reverted {
                tx_hash: format!("0x{}", hex::encode(transaction_hash)),
            });
        }
        current.extend(members.iter().copied());
        debug!(data_union = %self.address, added = members.len(), block_number, "addMembers");

        Ok(TxReceipt {
            transaction_hash,
            block_number,
        })
    }
}

/// Chain client over [`InMemoryDataUnion`]s.
#[derive(Debug, Default)]
pub struct InMemoryDataUnionClient {
    data_unions: RwLock<HashMap<Address, Arc<InMemoryDataUnion>>>,
}

impl InMemoryDataUnionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client with the given data unions already deployed.
    pub fn with_data_unions(addresses: impl IntoIterator<Item = Address>) -> Self {
        let client = Self::new();
        for address in addresses {
            client.deploy(address);
        }
        client
    }

    /// Deploy an empty data union at `address`. Deploying twice returns the
    /// existing one.
    pub fn deploy(&self, address: Address) -> Arc<InMemoryDataUnion> {
        self.data_unions
            .write()
            .entry(address)
            .or_insert_with(|| Arc::new(InMemoryDataUnion::new(address)))
            .clone()
    }

    pub fn data_union(&self, address: &Address) -> Option<Arc<InMemoryDataUnion>> {
        self.data_unions.read().get(address).cloned()
    }
}

#[async_trait]
impl DataUnionClient for InMemoryDataUnionClient {
    async fn get_data_union(
        &self,
        address: &Address,
    ) -> Result<Arc<dyn DataUnionHandle>, ChainClientError> {
        match self.data_union(address) {
            Some(data_union) => Ok(data_union as Arc<dyn DataUnionHandle>),
            None => Err(ChainClientError::NotFound(*address)),
        }
    }
}
