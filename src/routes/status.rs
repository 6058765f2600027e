//! Blockchain Status Endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::{error::ApiError, services::{status, BlockchainStatus}, AppState};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(flatten)]
    pub status: BlockchainStatus,
}

/// GET /api/blockchain/status
///
/// 노드 연결 불가 시 503 + `connected: false` (chainId 등은 생략)
pub async fn blockchain_status(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<StatusResponse>), ApiError> {
    let status = status::probe(state.chain.as_ref(), &state.config.eth_rpc_url).await?;

    let code = if status.connected {
        StatusCode::OK
    } else {
        tracing::warn!("Blockchain node unreachable at {}", state.config.eth_rpc_url);
        StatusCode::SERVICE_UNAVAILABLE
    };

    Ok((
        code,
        Json(StatusResponse {
            success: status.connected,
            status,
        }),
    ))
}
