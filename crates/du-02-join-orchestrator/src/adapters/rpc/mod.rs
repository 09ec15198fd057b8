//! Ethereum chain client over an alloy HTTP provider.
//!
//! ```text
//! get_data_union  eth_getCode (empty code → NotFound)
//! is_member       eth_call isMember(address)
//! add_members     eth_estimateGas, eth_gasPrice, eth_getTransactionCount,
//!                 eth_sendRawTransaction, eth_getTransactionReceipt (polled)
//! ```

mod client;

pub use client::{
    connect, parse_private_key, RpcClientOptions, RpcDataUnion, RpcDataUnionClient,
};
