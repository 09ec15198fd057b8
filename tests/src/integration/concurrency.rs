//! Concurrent joins for the same member are serialised in-process.

#[cfg(test)]
mod tests {
    use crate::fixtures::{config, error_message, Signer, TestServer, DATA_UNION};
    use futures::future::join_all;
    use serde_json::json;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_member_joins_once() {
        let server = TestServer::spawn(config()).await;
        let signer = Signer::random();
        let request = json!({ "dataUnion": DATA_UNION, "chain": "polygon" });

        let bodies: Vec<_> = (0..8).map(|_| signer.sign(&request)).collect();
        let results = join_all(bodies.iter().map(|b| server.post_json("/join", b))).await;

        let ok = results.iter().filter(|(status, _)| *status == 200).count();
        let already = results
            .iter()
            .filter(|(status, json)| *status == 400 && error_message(json).contains("already a member"))
            .count();
        assert_eq!(ok, 1);
        assert_eq!(already, 7);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_different_members_all_join() {
        let server = TestServer::spawn(config()).await;
        let signers: Vec<_> = (0..8).map(|_| Signer::random()).collect();
        let request = json!({ "dataUnion": DATA_UNION, "chain": "polygon" });

        let bodies: Vec<_> = signers.iter().map(|s| s.sign(&request)).collect();
        let results = join_all(bodies.iter().map(|b| server.post_json("/join", b))).await;

        assert!(results.iter().all(|(status, _)| *status == 200));
        assert_eq!(server.metrics.to_json()["joins_succeeded"], 8);
    }
}
