//! `POST /join`
//!
//! received → signature/freshness → member → data union → chain →
//! custom validator → orchestrator → responded. The first failing stage
//! answers with the error envelope.

use crate::middleware::{JoinMetrics, RejectionStage};
use crate::{ApiError, ApiResult};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use du_01_signed_request::{SignedRequest, SignedRequestApi, ValidatedRequest};
use du_02_join_orchestrator::{JoinRequest, JoinRequestApi, JoinRequestValidator};
use shared_types::{Address, Chain, ChainError, ChainRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Everything the join handler needs, fixed at startup.
#[derive(Clone)]
pub struct JoinState {
    pub signed_requests: Arc<dyn SignedRequestApi>,
    pub tolerance: Duration,
    pub chains: Arc<ChainRegistry>,
    pub default_chain: Option<Chain>,
    pub validator: Arc<dyn JoinRequestValidator>,
    pub orchestrator: Arc<dyn JoinRequestApi>,
    pub success_status: StatusCode,
    pub metrics: Arc<JoinMetrics>,
}

type StageResult<T> = Result<T, (RejectionStage, ApiError)>;

fn at<T, E: Into<ApiError>>(stage: RejectionStage, result: Result<T, E>) -> StageResult<T> {
    result.map_err(|e| (stage, e.into()))
}

pub async fn handle_join(State(state): State<JoinState>, body: Bytes) -> Response {
    state.metrics.record_request();

    match join(&state, &body).await {
        Ok(joined) => {
            state.metrics.record_success();
            info!(
                member = %joined.member,
                data_union = %joined.data_union,
                chain = %joined.chain,
                "Join request accepted"
            );
            (state.success_status, Json(joined)).into_response()
        }
        Err((stage, err)) => {
            state.metrics.record_rejection(stage);
            warn!(stage = ?stage, error = %err.message, "Join request rejected");
            err.into_response()
        }
    }
}

async fn join(state: &JoinState, body: &[u8]) -> StageResult<JoinRequest> {
    let signed: SignedRequest = at(RejectionStage::Body, serde_json::from_slice(body))?;

    let validated = at(
        RejectionStage::SignedRequest,
        state.signed_requests.validate(&signed, state.tolerance),
    )?;

    let member = *validated.caller();
    let data_union = at(
        RejectionStage::Input,
        Address::from_json(validated.data_union()),
    )?;
    let chain = at(RejectionStage::Input, resolve_chain(state, &validated))?;

    at(
        RejectionStage::Validator,
        state.validator.validate(&member, &validated).await,
    )?;

    at(
        RejectionStage::Join,
        state.orchestrator.create(member, data_union, chain).await,
    )
}

/// `chain` from the request, or the configured default when it is absent.
fn resolve_chain(state: &JoinState, request: &ValidatedRequest) -> ApiResult<Chain> {
    match request.chain() {
        None | Some(serde_json::Value::Null) => state
            .default_chain
            .clone()
            .ok_or_else(|| ChainError::Missing.into()),
        value => Ok(state.chains.resolve_json(value)?),
    }
}
