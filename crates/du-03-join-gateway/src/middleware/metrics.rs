//! Join counters, served as JSON on `/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Where a rejected join request stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionStage {
    /// Body not parseable as a signed request
    Body,
    /// Signature, timestamp or inner payload
    SignedRequest,
    /// Member/data union address or chain
    Input,
    /// Deployment validator said no
    Validator,
    /// Orchestrator failed (retrieval, already member, addMembers, hook)
    Join,
}

#[derive(Debug, Default)]
pub struct JoinMetrics {
    pub requests_total: AtomicU64,
    pub joins_succeeded: AtomicU64,
    pub rejected_body: AtomicU64,
    pub rejected_signed_request: AtomicU64,
    pub rejected_input: AtomicU64,
    pub rejected_validator: AtomicU64,
    pub rejected_join: AtomicU64,
    pub payload_too_large: AtomicU64,
}

impl JoinMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.joins_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self, stage: RejectionStage) {
        let counter = match stage {
            RejectionStage::Body => &self.rejected_body,
            RejectionStage::SignedRequest => &self.rejected_signed_request,
            RejectionStage::Input => &self.rejected_input,
            RejectionStage::Validator => &self.rejected_validator,
            RejectionStage::Join => &self.rejected_join,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_payload_too_large(&self) {
        self.payload_too_large.fetch_add(1, Ordering::Relaxed);
    }

    pub fn to_json(&self) -> serde_json::Value {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        serde_json::json!({
            "requests_total": load(&self.requests_total),
            "joins_succeeded": load(&self.joins_succeeded),
            "payload_too_large": load(&self.payload_too_large),
            "rejected": {
                "body": load(&self.rejected_body),
                "signed_request": load(&self.rejected_signed_request),
                "input": load(&self.rejected_input),
                "validator": load(&self.rejected_validator),
                "join": load(&self.rejected_join),
            }
        })
    }
}
