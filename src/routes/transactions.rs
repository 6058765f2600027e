//! Transaction Preparation Endpoints
//!
//! # Interview Q&A
//!
//! Q: 서버가 직접 트랜잭션을 전송하지 않는 이유는?
//! A: 서버는 private key 를 보관하지 않음
//!    - calldata / nonce / gas 만 채워서 반환
//!    - 서명과 전송은 사용자 지갑 (MetaMask 등) 에서
//!
//! Q: nonce 가 stale 해지면?
//! A: 노드가 전송 시점에 거부. 클라이언트가 다시 준비 요청

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    error::ApiError,
    routes::extract::ApiJson,
    services::{transactions, PreparedTransaction, TxAction},
    types::ApiResponse,
    AppState,
};

/// 도서 등록 요청
///
/// 필수 필드 누락은 역직렬화 단계가 아니라 Preparer 에서 400 으로 처리
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub description: Option<String>,
    /// 트랜잭션 sender
    #[serde(default)]
    pub owner: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub book_id: u64,
    #[serde(default)]
    pub borrower: String,
    /// 보증금 (wei)
    pub deposit_wei: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub book_id: u64,
    #[serde(default)]
    pub borrower: String,
    pub return_status: Option<u64>,
}

/// POST /api/transactions/mint
pub async fn prepare_mint(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<MintRequest>,
) -> Result<Json<ApiResponse<PreparedTransaction>>, ApiError> {
    tracing::info!("📖 Preparing mint for '{}' by {}", request.title, request.owner);

    let action = TxAction::Mint {
        title: request.title,
        author: request.author,
        description: request.description,
    };
    let prepared = transactions::prepare(state.chain.as_ref(), action, &request.owner).await?;

    Ok(Json(ApiResponse::success(prepared)))
}

/// POST /api/transactions/borrow
pub async fn prepare_borrow(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BorrowRequest>,
) -> Result<Json<ApiResponse<PreparedTransaction>>, ApiError> {
    tracing::info!("📤 Preparing borrow of book {} by {}", request.book_id, request.borrower);

    let action = TxAction::Borrow {
        book_id: request.book_id,
        deposit_wei: request.deposit_wei,
    };
    let prepared = transactions::prepare(state.chain.as_ref(), action, &request.borrower).await?;

    Ok(Json(ApiResponse::success(prepared)))
}

/// POST /api/transactions/return
pub async fn prepare_return(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReturnRequest>,
) -> Result<Json<ApiResponse<PreparedTransaction>>, ApiError> {
    tracing::info!("📥 Preparing return of book {} by {}", request.book_id, request.borrower);

    let action = TxAction::Return {
        book_id: request.book_id,
        return_status: request.return_status,
    };
    let prepared = transactions::prepare(state.chain.as_ref(), action, &request.borrower).await?;

    Ok(Json(ApiResponse::success(prepared)))
}
