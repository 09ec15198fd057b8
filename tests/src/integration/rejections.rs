//! Every rejection answers with the `{"error": {"message"}}` envelope.

#[cfg(test)]
mod tests {
    use crate::fixtures::{config, error_message, Signer, TestServer, DATA_UNION};
    use axum::routing::get;
    use axum::Router;
    use chrono::{Duration, Utc};
    use du_02_join_orchestrator::NoopMemberJoinHook;
    use serde_json::json;
    use std::sync::Arc;

    fn join_request() -> serde_json::Value {
        json!({ "dataUnion": DATA_UNION, "chain": "polygon" })
    }

    #[tokio::test]
    async fn test_tampered_request_is_invalid_signature() {
        let server = TestServer::spawn(config()).await;
        let signer = Signer::random();

        let mut body = signer.sign(&join_request());
        body["request"] = json!(json!({ "dataUnion": DATA_UNION, "chain": "gnosis" }).to_string());

        let (status, json) = server.post_json("/join", &body).await;
        assert_eq!(status, 400);
        assert!(error_message(&json).starts_with("Invalid signature"));
    }

    #[tokio::test]
    async fn test_claimed_address_must_match_signer() {
        let server = TestServer::spawn(config()).await;
        let signer = Signer::random();
        let other = Signer::random();

        let mut body = signer.sign(&join_request());
        body["address"] = json!(other.address().to_checksum());

        let (status, json) = server.post_json("/join", &body).await;
        assert_eq!(status, 400);
        assert!(error_message(&json).starts_with("Invalid signature"));
    }

    #[tokio::test]
    async fn test_ten_minute_old_timestamp_is_invalid() {
        let server = TestServer::spawn(config()).await;
        let signer = Signer::random();

        let body = signer.sign_at(&join_request(), Utc::now() - Duration::minutes(10));
        let (status, json) = server.post_json("/join", &body).await;
        assert_eq!(status, 400);
        assert!(error_message(&json).starts_with("Invalid timestamp"));

        let body = signer.sign_at(&join_request(), Utc::now() + Duration::minutes(10));
        let (status, json) = server.post_json("/join", &body).await;
        assert_eq!(status, 400);
        assert!(error_message(&json).starts_with("Invalid timestamp"));
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let server = TestServer::spawn(config()).await;
        let signer = Signer::random();

        for field in ["signature", "address", "timestamp"] {
            let mut body = signer.sign(&join_request());
            body.as_object_mut().unwrap().remove(field);
            let (status, json) = server.post_json("/join", &body).await;
            assert_eq!(status, 400, "missing {field}");
            assert!(error_message(&json).contains("missing"), "missing {field}");
        }
    }

    #[tokio::test]
    async fn test_already_member() {
        let server = TestServer::spawn(config()).await;
        let signer = Signer::random();

        let (status, _) = server.post_json("/join", &signer.sign(&join_request())).await;
        assert_eq!(status, 200);

        let (status, json) = server.post_json("/join", &signer.sign(&join_request())).await;
        assert_eq!(status, 400);
        assert!(error_message(&json).contains("already a member"));
    }

    #[tokio::test]
    async fn test_unknown_data_union_is_retrieval_error() {
        let server = TestServer::spawn(config()).await;
        let signer = Signer::random();

        let body = signer.sign(&json!({
            "dataUnion": "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359",
            "chain": "polygon",
        }));
        let (status, json) = server.post_json("/join", &body).await;
        assert_eq!(status, 400);
        assert!(error_message(&json).starts_with("Error while retrieving data union"));
    }

    #[tokio::test]
    async fn test_bad_inputs() {
        let server = TestServer::spawn(config()).await;
        let signer = Signer::random();

        let cases = [
            (json!({ "dataUnion": "0x1234", "chain": "polygon" }), "Invalid Ethereum address"),
            (json!({ "chain": "polygon" }), "Invalid Ethereum address"),
            (json!({ "dataUnion": DATA_UNION, "chain": "solana" }), "Unknown chain"),
            (json!({ "dataUnion": DATA_UNION }), "Chain name is missing"),
        ];
        for (request, expected) in cases {
            let (status, json) = server.post_json("/join", &signer.sign(&request)).await;
            assert_eq!(status, 400, "{request}");
            assert!(error_message(&json).starts_with(expected), "{request}: {json}");
        }

        let signed = signer.sign(&json!([1, 2, 3]));
        let (status, json) = server.post_json("/join", &signed).await;
        assert_eq!(status, 400);
        assert!(error_message(&json).starts_with("Malformed request"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = TestServer::spawn(config()).await;

        let (status, json) = server.post_raw("/join", "{not json").await;
        assert_eq!(status, 400);
        assert!(error_message(&json).starts_with("Malformed request body"));

        let (status, json) = server.post_raw("/join", r#"{"signature": 42}"#).await;
        assert_eq!(status, 400);
        assert!(error_message(&json).starts_with("Malformed request body"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let mut config = config();
        config.limits.max_request_size = 1024;
        let server = TestServer::spawn(config).await;

        let (status, json) = server.post_raw("/join", "x".repeat(4096)).await;
        assert_eq!(status, 413);
        assert!(error_message(&json).contains("1024 bytes"));
        assert_eq!(server.metrics.to_json()["payload_too_large"], 1);
    }

    #[tokio::test]
    async fn test_panicking_custom_route_is_500_envelope() {
        async fn boom() -> &'static str {
            panic!("deployment route failed")
        }

        let routes = Router::new().route("/boom", get(boom));
        let server =
            TestServer::spawn_with(config(), Arc::new(NoopMemberJoinHook), routes).await;

        let (status, json) = server.get("/boom").await;
        assert_eq!(status, 500);
        assert_eq!(json, json!({ "error": { "message": "Internal server error" } }));

        // The server keeps serving after a panic.
        let (status, _) = server.get("/health").await;
        assert_eq!(status, 200);
    }
}
