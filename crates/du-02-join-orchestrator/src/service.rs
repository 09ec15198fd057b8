//! # Join Request Service
//!
//! Implements [`JoinRequestApi`] over a [`ChainClientRegistry`] and a
//! [`MemberJoinHook`].
//!
//! ## Concurrency
//!
//! `isMember` followed by `addMembers` is a check-then-act race. Calls for
//! the same `(chain, dataUnion, member)` are serialised with an async lock so
//! the second caller observes the first one's result. The guarantee holds
//! within this process only.

use crate::domain::entities::JoinRequest;
use crate::domain::errors::JoinError;
use crate::ports::inbound::JoinRequestApi;
use crate::ports::outbound::{DataUnionClient, MemberJoinHook, NoopMemberJoinHook};
use async_trait::async_trait;
use dashmap::DashMap;
use shared_types::{Address, Chain};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Immutable chain → client map, built once at startup.
#[derive(Clone, Default)]
pub struct ChainClientRegistry {
    clients: HashMap<Chain, Arc<dyn DataUnionClient>>,
}

impl ChainClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A later client for the same chain replaces the
    /// earlier one.
    pub fn with_client(mut self, chain: Chain, client: Arc<dyn DataUnionClient>) -> Self {
        self.clients.insert(chain, client);
        self
    }

    pub fn get(&self, chain: &Chain) -> Option<&Arc<dyn DataUnionClient>> {
        self.clients.get(chain)
    }

    pub fn chains(&self) -> impl Iterator<Item = &Chain> {
        self.clients.keys()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl FromIterator<(Chain, Arc<dyn DataUnionClient>)> for ChainClientRegistry {
    fn from_iter<I: IntoIterator<Item = (Chain, Arc<dyn DataUnionClient>)>>(iter: I) -> Self {
        Self {
            clients: iter.into_iter().collect(),
        }
    }
}

type JoinKey = (Chain, Address, Address);
type LockTable = DashMap<JoinKey, Arc<Mutex<()>>>;

/// A claimed lock-table entry. Dropping it removes the entry once no other
/// caller still references the key's mutex.
struct InFlightEntry<'a> {
    table: &'a LockTable,
    key: JoinKey,
    lock: Arc<Mutex<()>>,
}

impl<'a> InFlightEntry<'a> {
    fn claim(table: &'a LockTable, key: JoinKey) -> Self {
        let lock = table
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Self { table, key, lock }
    }
}

impl Drop for InFlightEntry<'_> {
    fn drop(&mut self) {
        // The table's reference plus ours.
        self.table
            .remove_if(&self.key, |_, entry| Arc::strong_count(entry) == 2);
    }
}

struct Inner {
    clients: ChainClientRegistry,
    hook: Arc<dyn MemberJoinHook>,
    in_flight: LockTable,
}

/// Join orchestrator.
///
/// Each join runs on its own task. Once `create` has been called the
/// membership check, `addMembers` and the post-join hook run to completion
/// even if the caller stops waiting.
pub struct JoinRequestService {
    inner: Arc<Inner>,
}

impl JoinRequestService {
    /// Orchestrator with the no-op post-join hook.
    pub fn new(clients: ChainClientRegistry) -> Self {
        Self::with_hook(clients, Arc::new(NoopMemberJoinHook))
    }

    pub fn with_hook(clients: ChainClientRegistry, hook: Arc<dyn MemberJoinHook>) -> Self {
        Self {
            inner: Arc::new(Inner {
                clients,
                hook,
                in_flight: DashMap::new(),
            }),
        }
    }

    pub fn clients(&self) -> &ChainClientRegistry {
        &self.inner.clients
    }

    /// Number of keys currently holding a lock entry.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.len()
    }
}

impl Inner {
    async fn join_locked(
        &self,
        client: Arc<dyn DataUnionClient>,
        member: Address,
        data_union: Address,
        chain: Chain,
    ) -> Result<JoinRequest, JoinError> {
        let entry = InFlightEntry::claim(&self.in_flight, (chain.clone(), data_union, member));
        let _guard = entry.lock.lock().await;
        debug!(member = %member, data_union = %data_union, chain = %chain, "Processing join");
        self.join(client.as_ref(), member, data_union, chain).await
    }

    async fn join(
        &self,
        client: &dyn DataUnionClient,
        member: Address,
        data_union: Address,
        chain: Chain,
    ) -> Result<JoinRequest, JoinError> {
        let handle = client.get_data_union(&data_union).await.map_err(|e| {
            JoinError::DataUnionRetrieval {
                data_union,
                chain: chain.clone(),
                message: e.to_string(),
            }
        })?;

        let already_member =
            handle
                .is_member(&member)
                .await
                .map_err(|e| JoinError::MembershipCheck {
                    member,
                    data_union,
                    message: e.to_string(),
                })?;
        if already_member {
            return Err(JoinError::AlreadyMember { member, data_union });
        }

        let receipt = handle
            .add_members(&[member])
            .await
            .map_err(|e| JoinError::AddMembers {
                member,
                data_union,
                message: e.to_string(),
            })?;
        info!(
            member = %member,
            data_union = %data_union,
            chain = %chain,
            tx_hash = %receipt.transaction_hash_hex(),
            block = receipt.block_number,
            "Member added"
        );

        if let Err(e) = self
            .hook
            .on_member_join(&member, &data_union, &chain)
            .await
        {
            warn!(
                member = %member,
                data_union = %data_union,
                error = %e,
                "Post-join hook failed after addMembers committed"
            );
            return Err(JoinError::JoinHook {
                member,
                data_union,
                message: e.to_string(),
            });
        }

        Ok(JoinRequest {
            member,
            data_union,
            chain,
        })
    }
}

#[async_trait]
impl JoinRequestApi for JoinRequestService {
    async fn create(
        &self,
        member: Address,
        data_union: Address,
        chain: Chain,
    ) -> Result<JoinRequest, JoinError> {
        let client = self
            .inner
            .clients
            .get(&chain)
            .cloned()
            .ok_or_else(|| JoinError::ChainClientMissing {
                chain: chain.clone(),
            })?;

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            inner.join_locked(client, member, data_union, chain).await
        });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                warn!(member = %member, data_union = %data_union, error = %e, "Join task failed");
                Err(JoinError::Interrupted {
                    member,
                    data_union,
                    message: e.to_string(),
                })
            }
        }
    }
}
