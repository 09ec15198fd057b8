//! Happy-path joins through the full stack.

#[cfg(test)]
mod tests {
    use crate::fixtures::{config, error_message, Signer, TestServer, DATA_UNION, DATA_UNION_CHECKSUM};
    use async_trait::async_trait;
    use du_02_join_orchestrator::{HookError, MemberJoinHook};
    use parking_lot::Mutex;
    use serde_json::json;
    use shared_types::{Address, Chain};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fresh_member_joins_with_canonical_addresses() {
        let server = TestServer::spawn(config()).await;
        let signer = Signer::random();

        let body = signer.sign(&json!({ "dataUnion": DATA_UNION, "chain": "POLYGON" }));
        let (status, json) = server.post_json("/join", &body).await;

        assert_eq!(status, 200);
        assert_eq!(
            json,
            json!({
                "member": signer.address().to_checksum(),
                "dataUnion": DATA_UNION_CHECKSUM,
                "chain": "polygon",
            })
        );
        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_configured_path_default_chain_and_created_status() {
        let mut config = config();
        config.http.join_path = "/api/join".into();
        config.http.created_status = true;
        config.default_chain = Some("polygon".into());
        let server = TestServer::spawn(config).await;
        let signer = Signer::random();

        let body = signer.sign(&json!({ "dataUnion": DATA_UNION_CHECKSUM }));
        let (status, json) = server.post_json("/api/join", &body).await;
        assert_eq!(status, 201);
        assert_eq!(json["chain"], "polygon");

        let (status, json) = server.post_json("/join", &body).await;
        assert_eq!(status, 404);
        assert_eq!(error_message(&json), "Not found: /join");
    }

    #[derive(Default)]
    struct RecordingHook {
        joined: Mutex<Vec<(Address, Address, String)>>,
    }

    #[async_trait]
    impl MemberJoinHook for RecordingHook {
        async fn on_member_join(
            &self,
            member: &Address,
            data_union: &Address,
            chain: &Chain,
        ) -> Result<(), HookError> {
            self.joined
                .lock()
                .push((*member, *data_union, chain.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_hook_sees_the_join() {
        let hook = Arc::new(RecordingHook::default());
        let server =
            TestServer::spawn_with(config(), hook.clone(), axum::Router::new()).await;
        let signer = Signer::random();

        let body = signer.sign(&json!({ "dataUnion": DATA_UNION, "chain": "polygon" }));
        let (status, _) = server.post_json("/join", &body).await;
        assert_eq!(status, 200);

        let joined = hook.joined.lock().clone();
        assert_eq!(
            joined,
            vec![(
                signer.address(),
                Address::parse(DATA_UNION).unwrap(),
                "polygon".to_string()
            )]
        );
    }

    struct FailingHook;

    #[async_trait]
    impl MemberJoinHook for FailingHook {
        async fn on_member_join(
            &self,
            _member: &Address,
            _data_union: &Address,
            _chain: &Chain,
        ) -> Result<(), HookError> {
            Err(HookError("stream permission grant failed".into()))
        }
    }

    #[tokio::test]
    async fn test_hook_failure_is_a_join_error_after_commit() {
        let server =
            TestServer::spawn_with(config(), Arc::new(FailingHook), axum::Router::new()).await;
        let signer = Signer::random();
        let request = json!({ "dataUnion": DATA_UNION, "chain": "polygon" });

        let (status, json) = server.post_json("/join", &signer.sign(&request)).await;
        assert_eq!(status, 400);
        assert!(error_message(&json).contains("stream permission grant failed"));

        // addMembers committed before the hook ran.
        let (status, json) = server.post_json("/join", &signer.sign(&request)).await;
        assert_eq!(status, 400);
        assert!(error_message(&json).contains("already a member"));
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let server = TestServer::spawn(config()).await;
        let signer = Signer::random();

        let (status, json) = server.get("/health").await;
        assert_eq!(status, 200);
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());

        let body = signer.sign(&json!({ "dataUnion": DATA_UNION, "chain": "polygon" }));
        server.post_json("/join", &body).await;
        server.post_json("/join", &body).await;

        let (status, json) = server.get("/metrics").await;
        assert_eq!(status, 200);
        assert_eq!(json["requests_total"], 2);
        assert_eq!(json["joins_succeeded"], 1);
        assert_eq!(json["rejected"]["join"], 1);
    }
}
