//! RPC Chain Client Adapter
//!
//! Implements [`DataUnionClient`] against an Ethereum node through an alloy
//! provider. `addMembers` is signed locally with the join-part agent key and
//! sent as an EIP-155 legacy transaction.

use crate::domain::errors::ChainClientError;
use crate::ports::outbound::{DataUnionClient, DataUnionHandle, TxReceipt};
use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address as EthAddress, TxHash};
use alloy::providers::fillers::ChainIdFiller;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::transports::http::reqwest::Url;
use alloy::transports::http::{Client, Http};
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use shared_types::{Address, ChainConfig};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

sol! {
    #[sol(rpc)]
    interface IDataUnion {
        function isMember(address member) external view returns (bool);
        function addMembers(address[] calldata members) external;
    }
}

/// Timing knobs for the RPC client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcClientOptions {
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Delay between receipt polls
    pub poll_interval: Duration,
    /// Give up waiting for a receipt after this long
    pub receipt_timeout: Duration,
    /// Added on top of `eth_estimateGas`, in percent
    pub gas_limit_margin_percent: u64,
}

impl Default for RpcClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(1),
            receipt_timeout: Duration::from_secs(120),
            gas_limit_margin_percent: 20,
        }
    }
}

/// Parse a hex secp256k1 private key, with or without `0x`.
pub fn parse_private_key(value: &str) -> Result<PrivateKeySigner, ChainClientError> {
    let digits = value.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    let bytes = hex::decode(digits).map_err(|e| ChainClientError::InvalidKey(e.to_string()))?;
    PrivateKeySigner::from_slice(&bytes).map_err(|e| ChainClientError::InvalidKey(e.to_string()))
}

/// Connect an HTTP provider for one chain, signing with `signer`.
///
/// Nonces come from the node's pending count and the chain id is pinned to
/// the configured one. Gas is always set explicitly by the client.
pub fn connect(
    config: &ChainConfig,
    signer: PrivateKeySigner,
    options: RpcClientOptions,
) -> Result<RpcDataUnionClient<impl Provider<Http<Client>> + 'static>, ChainClientError> {
    let url: Url = config.rpc_url.parse().map_err(|e| {
        ChainClientError::Transport(format!("invalid RPC url {}: {e}", config.rpc_url))
    })?;
    let sender = signer.address();
    let provider = ProviderBuilder::new()
        .with_simple_nonce_management()
        .filler(ChainIdFiller::new(Some(config.chain_id)))
        .wallet(EthereumWallet::from(signer))
        .on_http(url);

    info!(rpc_url = %config.rpc_url, chain_id = config.chain_id, sender = %sender, "RPC chain client ready");
    Ok(RpcDataUnionClient::with_provider(provider, config, sender, options))
}

fn to_eth(address: &Address) -> EthAddress {
    EthAddress::from(*address.as_bytes())
}

fn from_eth(address: EthAddress) -> Address {
    Address::from_bytes(address.into())
}

fn transport_error(error: TransportError) -> ChainClientError {
    match error {
        RpcError::ErrorResp(payload) => ChainClientError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        RpcError::Transport(kind) => ChainClientError::Transport(kind.to_string()),
        RpcError::LocalUsageError(e) => ChainClientError::Signing(e.to_string()),
        other => ChainClientError::InvalidResponse(other.to_string()),
    }
}

fn contract_error(error: alloy::contract::Error) -> ChainClientError {
    match error {
        alloy::contract::Error::TransportError(e) => transport_error(e),
        other => ChainClientError::InvalidResponse(other.to_string()),
    }
}

struct Shared<P> {
    provider: P,
    sender: EthAddress,
    gas_limit: Option<u64>,
    gas_price: Option<u64>,
    options: RpcClientOptions,
    /// Held from nonce lookup until the transaction is accepted by the node.
    submit_lock: Mutex<()>,
}

impl<P> Shared<P> {
    /// Bound one node round trip by `request_timeout`.
    async fn timed<F, T, E>(
        &self,
        request: F,
        map_err: fn(E) -> ChainClientError,
    ) -> Result<T, ChainClientError>
    where
        F: IntoFuture<Output = Result<T, E>>,
    {
        let limit = self.options.request_timeout;
        match tokio::time::timeout(limit, request.into_future()).await {
            Ok(result) => result.map_err(map_err),
            Err(_) => Err(ChainClientError::Transport(format!(
                "request timed out after {limit:?}"
            ))),
        }
    }
}

/// Data union client for one chain.
pub struct RpcDataUnionClient<P> {
    shared: Arc<Shared<P>>,
}

impl<P> Clone for RpcDataUnionClient<P> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<P> RpcDataUnionClient<P>
where
    P: Provider<Http<Client>> + 'static,
{
    /// Wrap a provider that already signs for `sender`.
    pub fn with_provider(
        provider: P,
        config: &ChainConfig,
        sender: EthAddress,
        options: RpcClientOptions,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                provider,
                sender,
                gas_limit: config.gas_limit,
                gas_price: config.gas_price,
                options,
                submit_lock: Mutex::new(()),
            }),
        }
    }

    /// The join-part agent address transactions are sent from.
    pub fn sender(&self) -> Address {
        from_eth(self.shared.sender)
    }
}

#[async_trait]
impl<P> DataUnionClient for RpcDataUnionClient<P>
where
    P: Provider<Http<Client>> + 'static,
{
    async fn get_data_union(
        &self,
        address: &Address,
    ) -> Result<Arc<dyn DataUnionHandle>, ChainClientError> {
        let code = self
            .shared
            .timed(
                self.shared.provider.get_code_at(to_eth(address)),
                transport_error,
            )
            .await?;
        if code.is_empty() {
            return Err(ChainClientError::NotFound(*address));
        }

        Ok(Arc::new(RpcDataUnion {
            address: *address,
            shared: self.shared.clone(),
        }))
    }
}

/// Data union contract reached through the provider.
pub struct RpcDataUnion<P> {
    address: Address,
    shared: Arc<Shared<P>>,
}

impl<P> RpcDataUnion<P>
where
    P: Provider<Http<Client>> + 'static,
{
    async fn gas_price(&self) -> Result<u128, ChainClientError> {
        match self.shared.gas_price {
            Some(price) => Ok(u128::from(price)),
            None => {
                self.shared
                    .timed(self.shared.provider.get_gas_price(), transport_error)
                    .await
            }
        }
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<u64, ChainClientError> {
        let options = self.shared.options;
        let started = Instant::now();

        loop {
            let receipt = self
                .shared
                .timed(
                    self.shared.provider.get_transaction_receipt(tx_hash),
                    transport_error,
                )
                .await?;

            if let Some(receipt) = receipt {
                if let Some(block_number) = receipt.block_number() {
                    if !receipt.status() {
                        return Err(ChainClientError::Reverted {
                            tx_hash: tx_hash.to_string(),
                        });
                    }
                    return Ok(block_number);
                }
            }

            if started.elapsed() >= options.receipt_timeout {
                return Err(ChainClientError::ReceiptTimeout {
                    tx_hash: tx_hash.to_string(),
                    waited: started.elapsed(),
                });
            }
            tokio::time::sleep(options.poll_interval).await;
        }
    }
}

#[async_trait]
impl<P> DataUnionHandle for RpcDataUnion<P>
where
    P: Provider<Http<Client>> + 'static,
{
    fn address(&self) -> Address {
        self.address
    }

    async fn is_member(&self, member: &Address) -> Result<bool, ChainClientError> {
        let contract = IDataUnion::new(to_eth(&self.address), &self.shared.provider);
        let result = self
            .shared
            .timed(contract.isMember(to_eth(member)).call(), contract_error)
            .await?;
        Ok(result._0)
    }

    async fn add_members(&self, members: &[Address]) -> Result<TxReceipt, ChainClientError> {
        let contract = IDataUnion::new(to_eth(&self.address), &self.shared.provider);
        let call = contract
            .addMembers(members.iter().map(to_eth).collect())
            .from(self.shared.sender);

        let tx_hash = {
            let _submit = self.shared.submit_lock.lock().await;

            let gas_limit = match self.shared.gas_limit {
                Some(limit) => limit,
                None => {
                    let estimate = self
                        .shared
                        .timed(call.estimate_gas(), contract_error)
                        .await?;
                    estimate.saturating_mul(100 + self.shared.options.gas_limit_margin_percent)
                        / 100
                }
            };
            let gas_price = self.gas_price().await?;

            let pending = self
                .shared
                .timed(call.gas(gas_limit).gas_price(gas_price).send(), contract_error)
                .await?;
            let tx_hash = *pending.tx_hash();
            debug!(
                data_union = %self.address,
                tx_hash = %tx_hash,
                gas_limit,
                gas_price,
                "addMembers submitted"
            );
            tx_hash
        };

        let block_number = self.wait_for_receipt(tx_hash).await?;
        Ok(TxReceipt {
            transaction_hash: tx_hash.0,
            block_number,
        })
    }
}
