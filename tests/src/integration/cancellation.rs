//! A client that hangs up mid-join does not cut the join short.

#[cfg(test)]
mod tests {
    use crate::fixtures::{config, error_message, Signer, TestServer, DATA_UNION};
    use async_trait::async_trait;
    use du_02_join_orchestrator::{
        ChainClientError, ChainClientRegistry, DataUnionClient, DataUnionHandle, HookError,
        InMemoryDataUnion, InMemoryDataUnionClient, JoinRequestApi, JoinRequestService,
        MemberJoinHook, TxReceipt,
    };
    use du_03_join_gateway::JoinGatewayService;
    use serde_json::json;
    use shared_types::{Address, Chain};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// In-memory data union whose `addMembers` takes a while to mine.
    struct SlowDataUnion {
        inner: Arc<InMemoryDataUnion>,
        delay: Duration,
        add_calls: AtomicUsize,
    }

    #[async_trait]
    impl DataUnionHandle for SlowDataUnion {
        fn address(&self) -> Address {
            self.inner.address()
        }

        async fn is_member(&self, member: &Address) -> Result<bool, ChainClientError> {
            self.inner.is_member(member).await
        }

        async fn add_members(&self, members: &[Address]) -> Result<TxReceipt, ChainClientError> {
            self.add_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.inner.add_members(members).await
        }
    }

    struct SlowClient {
        data_union: Arc<SlowDataUnion>,
    }

    #[async_trait]
    impl DataUnionClient for SlowClient {
        async fn get_data_union(
            &self,
            address: &Address,
        ) -> Result<Arc<dyn DataUnionHandle>, ChainClientError> {
            if *address == self.data_union.address() {
                Ok(self.data_union.clone() as Arc<dyn DataUnionHandle>)
            } else {
                Err(ChainClientError::NotFound(*address))
            }
        }
    }

    #[derive(Default)]
    struct CountingHook {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MemberJoinHook for CountingHook {
        async fn on_member_join(
            &self,
            _member: &Address,
            _data_union: &Address,
            _chain: &Chain,
        ) -> Result<(), HookError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Fixture {
        server: TestServer,
        orchestrator: Arc<JoinRequestService>,
        data_union: Arc<SlowDataUnion>,
        hook: Arc<CountingHook>,
    }

    async fn spawn(delay: Duration) -> Fixture {
        let config = config();
        let polygon = config
            .chain_registry()
            .unwrap()
            .resolve("polygon")
            .unwrap();
        let address = Address::parse(DATA_UNION).unwrap();
        let data_union = Arc::new(SlowDataUnion {
            inner: InMemoryDataUnionClient::new().deploy(address),
            delay,
            add_calls: AtomicUsize::new(0),
        });
        let clients = ChainClientRegistry::new().with_client(
            polygon,
            Arc::new(SlowClient {
                data_union: data_union.clone(),
            }),
        );
        let hook = Arc::new(CountingHook::default());
        let orchestrator = Arc::new(JoinRequestService::with_hook(clients, hook.clone()));

        let api: Arc<dyn JoinRequestApi> = orchestrator.clone();
        let gateway = JoinGatewayService::new(config, api).unwrap();
        Fixture {
            server: TestServer::spawn_gateway(gateway).await,
            orchestrator,
            data_union,
            hook,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_client_timeout_mid_add_members_still_completes_join() {
        let fixture = spawn(Duration::from_millis(300)).await;
        let signer = Signer::random();
        let body = signer.sign(&json!({ "dataUnion": DATA_UNION, "chain": "polygon" }));

        let impatient = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let err = impatient
            .post(fixture.server.url("/join"))
            .json(&body)
            .send()
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(fixture.data_union.add_calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(fixture.hook.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fixture.orchestrator.in_flight(), 0);
        assert!(fixture.data_union.inner.members().contains(&signer.address()));

        let retry = signer.sign(&json!({ "dataUnion": DATA_UNION, "chain": "polygon" }));
        let (status, json) = fixture.server.post_json("/join", &retry).await;
        assert_eq!(status, 400);
        assert!(error_message(&json).contains("already a member"));
        assert_eq!(fixture.data_union.add_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_patient_client_sees_the_join() {
        let fixture = spawn(Duration::from_millis(50)).await;
        let signer = Signer::random();
        let body = signer.sign(&json!({ "dataUnion": DATA_UNION, "chain": "polygon" }));

        let (status, json) = fixture.server.post_json("/join", &body).await;

        assert_eq!(status, 200, "{json}");
        assert_eq!(fixture.hook.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fixture.orchestrator.in_flight(), 0);
    }
}
