//! # Wiring
//!
//! Turns a validated [`JoinServerConfig`] into chain clients, the join
//! orchestrator and the gateway.

use anyhow::{Context, Result};
use du_02_join_orchestrator::adapters::rpc;
use du_02_join_orchestrator::{
    parse_private_key, ChainClientRegistry, DataUnionClient, InMemoryDataUnionClient,
    JoinRequestService, MemberJoinHook, NoopMemberJoinHook,
};
use du_03_join_gateway::{ClientMode, JoinGatewayService, JoinServerConfig};
use shared_types::{Address, ChainRegistry};
use std::sync::Arc;
use tracing::info;

/// One chain client per configured chain.
pub fn build_chain_clients(
    config: &JoinServerConfig,
    chains: &ChainRegistry,
) -> Result<ChainClientRegistry> {
    let mut clients = ChainClientRegistry::new();

    match config.client.mode {
        ClientMode::InMemory => {
            for (chain, chain_config) in chains.iter() {
                let data_unions = chain_config
                    .data_unions
                    .iter()
                    .map(|du| Address::parse(du))
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| format!("Invalid data union for chain {chain}"))?;
                info!(
                    chain = %chain,
                    data_unions = data_unions.len(),
                    "In-memory chain client"
                );
                let client: Arc<dyn DataUnionClient> =
                    Arc::new(InMemoryDataUnionClient::with_data_unions(data_unions));
                clients = clients.with_client(chain, client);
            }
        }
        ClientMode::Rpc => {
            let key = config
                .client
                .private_key
                .as_deref()
                .context("client mode 'rpc' requires DU_PRIVATE_KEY or client.private_key")?;
            let signer = parse_private_key(key).context("Invalid join-part agent key")?;
            for (chain, chain_config) in chains.iter() {
                let client: Arc<dyn DataUnionClient> = Arc::new(
                    rpc::connect(chain_config, signer.clone(), config.client.rpc_options())
                        .with_context(|| format!("Failed to create RPC client for chain {chain}"))?,
                );
                clients = clients.with_client(chain, client);
            }
        }
    }

    Ok(clients)
}

/// Build the gateway with the no-op post-join hook.
pub fn build_gateway(config: JoinServerConfig) -> Result<JoinGatewayService> {
    build_gateway_with_hook(config, Arc::new(NoopMemberJoinHook))
}

/// Build the gateway, running `hook` after every successful join.
pub fn build_gateway_with_hook(
    config: JoinServerConfig,
    hook: Arc<dyn MemberJoinHook>,
) -> Result<JoinGatewayService> {
    let chains = config.chain_registry().context("Invalid chain registry")?;
    let clients = build_chain_clients(&config, &chains)?;
    let orchestrator = Arc::new(JoinRequestService::with_hook(clients, hook));
    JoinGatewayService::new(config, orchestrator).context("Failed to build join gateway")
}
