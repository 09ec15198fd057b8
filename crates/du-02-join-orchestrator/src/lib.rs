//! # Join Orchestration (DU-02)
//!
//! Admits an authenticated member into a data union on a given chain.
//!
//! ## Flow
//!
//! ```text
//! create(member, dataUnion, chain)
//!   ├── chain client for `chain`        (ChainClientMissing)
//!   ├── getDataUnion(dataUnion)         (DataUnionRetrieval)
//!   ├── isMember(member)                (AlreadyMember / MembershipCheck)
//!   ├── addMembers([member])            (AddMembers)
//!   └── onMemberJoin(member, du, chain) (JoinHook)
//! ```
//!
//! Every external call is attempted once. `addMembers` cannot be rolled
//! back, so a hook failure is reported after the member is already on-chain;
//! hooks must be idempotent.
//!
//! ## Module Structure
//!
//! ```text
//! du-02-join-orchestrator/
//! ├── domain/     # JoinRequest result, JoinError + kinds
//! ├── ports/      # JoinRequestApi, DataUnionClient, hooks, validators
//! ├── adapters/   # in-memory and alloy RPC chain clients
//! └── service.rs  # JoinRequestService, ChainClientRegistry
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::in_memory::{InMemoryDataUnion, InMemoryDataUnionClient};
pub use adapters::rpc::{parse_private_key, RpcClientOptions, RpcDataUnionClient};
pub use domain::entities::JoinRequest;
pub use domain::errors::{ChainClientError, ErrorKind, HookError, JoinError, RejectedJoinRequest};
pub use ports::inbound::JoinRequestApi;
pub use ports::outbound::{
    DataUnionClient, DataUnionHandle, JoinRequestValidator, MemberJoinHook,
    NoopJoinRequestValidator, NoopMemberJoinHook, TxReceipt,
};
pub use service::{ChainClientRegistry, JoinRequestService};
