//! Test fixtures shared by the integration flows.

use axum::Router;
use chrono::{DateTime, Utc};
use du_01_signed_request::{address_from_pubkey, sign_personal_message, SignedRequest};
use du_02_join_orchestrator::{MemberJoinHook, NoopMemberJoinHook};
use du_03_join_gateway::{JoinGatewayService, JoinMetrics, JoinServerConfig};
use k256::ecdsa::SigningKey;
use serde_json::{json, Value};
use shared_types::Address;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Data union seeded into the in-memory client for `polygon`.
pub const DATA_UNION: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
pub const DATA_UNION_CHECKSUM: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

/// Default config with `polygon` carrying [`DATA_UNION`].
pub fn config() -> JoinServerConfig {
    let mut config = JoinServerConfig::default();
    if let Some(polygon) = config.chains.get_mut("polygon") {
        polygon.data_unions.push(DATA_UNION.to_string());
    }
    config
}

/// A member key that signs join requests.
pub struct Signer {
    key: SigningKey,
}

impl Signer {
    pub fn random() -> Self {
        Self {
            key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    pub fn address(&self) -> Address {
        address_from_pubkey(self.key.verifying_key())
    }

    /// Signed body for `request`, timestamped now.
    pub fn sign(&self, request: &Value) -> Value {
        self.sign_at(request, Utc::now())
    }

    pub fn sign_at(&self, request: &Value, at: DateTime<Utc>) -> Value {
        let request = request.to_string();
        let timestamp = at.to_rfc3339();
        let payload = SignedRequest::signing_payload(&request, &timestamp);
        let signature = sign_personal_message(&self.key, payload.as_bytes())
            .expect("signing with a valid key");
        json!({
            "address": self.address().to_lower_hex(),
            "request": request,
            "timestamp": timestamp,
            "signature": signature,
        })
    }
}

/// A join server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub metrics: Arc<JoinMetrics>,
    client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn spawn(config: JoinServerConfig) -> Self {
        Self::spawn_with(config, Arc::new(NoopMemberJoinHook), Router::new()).await
    }

    /// Build through the runtime wiring, with a hook and extra routes.
    pub async fn spawn_with(
        config: JoinServerConfig,
        hook: Arc<dyn MemberJoinHook>,
        routes: Router,
    ) -> Self {
        let gateway = join_runtime::build_gateway_with_hook(config, hook)
            .expect("gateway builds")
            .with_routes(routes);
        Self::spawn_gateway(gateway).await
    }

    /// Serve an already assembled gateway.
    pub async fn spawn_gateway(gateway: JoinGatewayService) -> Self {
        let metrics = gateway.metrics();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            gateway
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await
                .expect("server runs");
        });

        Self {
            addr,
            metrics,
            client: reqwest::Client::new(),
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON body, returning status and parsed body.
    pub async fn post_json(&self, path: &str, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request sent");
        Self::read(response).await
    }

    pub async fn post_raw(&self, path: &str, body: impl Into<reqwest::Body>) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("request sent");
        Self::read(response).await
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("request sent");
        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> (u16, Value) {
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    /// Stop accepting, drain, and wait for the server task.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.await.expect("server task");
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// The `error.message` of an envelope, or "" when absent.
pub fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}
