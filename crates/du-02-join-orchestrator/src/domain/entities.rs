use serde::Serialize;
use shared_types::{Address, Chain};

/// Outcome of a successful join, rendered as `{member, dataUnion, chain}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub member: Address,
    pub data_union: Address,
    pub chain: Chain,
}
