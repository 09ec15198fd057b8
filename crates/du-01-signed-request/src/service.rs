//! # Signed Request Validator
//!
//! Implements [`SignedRequestApi`]. Checks run in a fixed order: required
//! fields, signer recovery, freshness, then payload shape. The first failure
//! wins.

use crate::domain::ecdsa;
use crate::domain::entities::{SignedRequest, ValidatedRequest};
use crate::domain::errors::SignedRequestError;
use crate::ports::inbound::SignedRequestApi;
use crate::ports::outbound::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default freshness window.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(5 * 60);

/// Validates signed join requests against a [`Clock`].
#[derive(Clone)]
pub struct SignedRequestValidator {
    clock: Arc<dyn Clock>,
}

impl SignedRequestValidator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    fn check_freshness(
        &self,
        timestamp: &str,
        tolerance: Duration,
    ) -> Result<(), SignedRequestError> {
        let signed_at = DateTime::parse_from_rfc3339(timestamp).map_err(|e| {
            SignedRequestError::InvalidTimestamp(format!("cannot parse {timestamp:?}: {e}"))
        })?;

        let skew_ms = (self.clock.now() - signed_at.with_timezone(&Utc))
            .num_milliseconds()
            .unsigned_abs();
        let tolerance_ms = u64::try_from(tolerance.as_millis()).unwrap_or(u64::MAX);

        if skew_ms > tolerance_ms {
            return Err(SignedRequestError::InvalidTimestamp(format!(
                "{timestamp} is {skew_ms}ms away from server time (tolerance {tolerance_ms}ms)"
            )));
        }
        Ok(())
    }
}

impl Default for SignedRequestValidator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

/// Present and non-empty.
fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

impl SignedRequestApi for SignedRequestValidator {
    fn validate(
        &self,
        signed: &SignedRequest,
        tolerance: Duration,
    ) -> Result<ValidatedRequest, SignedRequestError> {
        let signature = required(&signed.signature).ok_or_else(|| {
            SignedRequestError::InvalidSignature("signature is missing".to_string())
        })?;
        let address = required(&signed.address)
            .ok_or_else(|| SignedRequestError::InvalidSignature("address is missing".to_string()))?;
        let timestamp = required(&signed.timestamp).ok_or_else(|| {
            SignedRequestError::InvalidTimestamp("timestamp is missing".to_string())
        })?;
        let request = signed.request.as_deref().unwrap_or_default();

        let payload = SignedRequest::signing_payload(request, timestamp);
        let recovered = ecdsa::recover_personal_signer(payload.as_bytes(), signature)?;

        if !recovered.to_lower_hex().eq_ignore_ascii_case(address) {
            debug!(claimed = %address, recovered = %recovered, "Signer mismatch");
            return Err(SignedRequestError::InvalidSignature(format!(
                "signer {recovered} does not match address {address}"
            )));
        }

        self.check_freshness(timestamp, tolerance)?;

        let body = match serde_json::from_str::<Value>(request) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(SignedRequestError::MalformedRequest(format!(
                    "request must be a JSON object, got {other}"
                )))
            }
            Err(e) => {
                return Err(SignedRequestError::MalformedRequest(format!(
                    "request is not valid JSON: {e}"
                )))
            }
        };

        Ok(ValidatedRequest::new(recovered, body))
    }
}
