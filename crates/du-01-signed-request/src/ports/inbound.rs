//! Inbound port: what the HTTP layer calls.

use crate::domain::entities::{SignedRequest, ValidatedRequest};
use crate::domain::errors::SignedRequestError;
use std::time::Duration;

/// Signed-request validation API.
pub trait SignedRequestApi: Send + Sync {
    /// Authenticate `signed` and check its timestamp is within `tolerance` of
    /// now, past or future. Returns the parsed inner request.
    fn validate(
        &self,
        signed: &SignedRequest,
        tolerance: Duration,
    ) -> Result<ValidatedRequest, SignedRequestError>;
}
