//! Health Check Endpoint
//!
//! # Interview Q&A
//!
//! Q: /health 와 /api/blockchain/status 의 차이는?
//! A: 용도가 다름
//!    - /health: 로드밸런서/프로브용. 항상 200, status 필드로 degraded 표시
//!    - /api/blockchain/status: 프론트엔드용 상세 상태. 노드 불가 시 503
//!
//! Q: 컨트랙트가 로드되지 않아도 healthy 인가?
//! A: "degraded". 프로세스는 살아있지만 도서 조회/트랜잭션 준비 불가

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health check 응답
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub blockchain_connected: bool,
    pub contracts_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_block: Option<u64>,
    pub message: String,
    pub timestamp: String,
}

/// GET /health
///
/// 서버 및 의존성 상태 확인
pub async fn health_check(
    State(state): State<AppState>,
) -> Json<HealthResponse> {
    let connected = state.chain.is_connected().await;
    let contracts_loaded = state.chain.deployment().is_some();

    let (chain_id, latest_block) = if connected {
        (
            state.chain.chain_id().await.ok(),
            state.chain.block_number().await.ok(),
        )
    } else {
        (None, None)
    };

    let healthy = connected && contracts_loaded;

    Json(HealthResponse {
        status: if healthy { "running" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        blockchain_connected: connected,
        contracts_loaded,
        chain_id,
        latest_block,
        message: if healthy {
            "All systems operational"
        } else {
            "Some services unavailable"
        }
        .to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
