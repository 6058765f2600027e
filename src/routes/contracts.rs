//! Contract Address Endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{error::ApiError, services::Deployment, types::ApiResponse, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractsResponse {
    pub contracts: Deployment,
    pub chain_id: u64,
    pub network: String,
}

/// GET /api/contracts
///
/// 노드 조회 없이 로드된 배포 정보 + 설정값만 반환
pub async fn get_contracts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ContractsResponse>>, ApiError> {
    let deployment = state
        .chain
        .deployment()
        .cloned()
        .ok_or_else(|| ApiError::ServiceUnavailable("Contracts (not loaded)".to_string()))?;

    Ok(Json(ApiResponse::success(ContractsResponse {
        contracts: deployment,
        chain_id: state.config.chain_id,
        network: state.config.network_name.clone(),
    })))
}
