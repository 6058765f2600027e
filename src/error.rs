//! Error Handling Module
//!
//! Provides type-safe error handling with proper HTTP status code mapping.
//! Uses thiserror for domain errors and integrates with tracing for structured logging.
//!
//! ```text
//! ChainError  (RPC / ABI layer)  ─┐
//! PrepareError (tx validation)   ─┼──▶ ApiError ──▶ (StatusCode, JSON envelope)
//! anyhow::Error                   ─┘
//! ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ethers::providers::ProviderError;
use serde::Serialize;
use thiserror::Error;

/// 체인 조회 에러
///
/// 자동 재시도 없음. 재시도 여부는 호출자가 결정
#[derive(Debug, Clone, Error)]
pub enum ChainError {
    /// contracts.json / ABI 로드 실패로 컨트랙트 핸들 없음
    #[error("contracts not loaded")]
    ContractsNotLoaded,

    /// 노드 연결 불가 (전송 계층 실패)
    #[error("blockchain node unavailable: {0}")]
    Unavailable(String),

    /// eth_call 실행 revert (예: 존재하지 않는 book id)
    #[error("contract call reverted: {0}")]
    Reverted(String),

    /// ABI 인코딩/디코딩 실패, 예상과 다른 반환 형식
    #[error("failed to decode contract data: {0}")]
    Decode(String),

    /// 그 외 RPC 에러
    #[error("rpc error: {0}")]
    Rpc(String),
}

impl From<ProviderError> for ChainError {
    fn from(err: ProviderError) -> Self {
        match err {
            // JSON-RPC 에러 응답이 왔다면 노드는 살아있음 → revert
            ProviderError::JsonRpcClientError(e) => match e.as_error_response() {
                // code 3 = execution reverted (geth/hardhat)
                Some(resp) if resp.code == 3 || resp.message.contains("revert") => {
                    ChainError::Reverted(resp.message.clone())
                }
                Some(resp) => ChainError::Rpc(format!("{} (code {})", resp.message, resp.code)),
                None => ChainError::Unavailable(e.to_string()),
            },
            ProviderError::HTTPError(e) => ChainError::Unavailable(e.to_string()),
            other => ChainError::Rpc(other.to_string()),
        }
    }
}

impl From<ethers::abi::Error> for ChainError {
    fn from(err: ethers::abi::Error) -> Self {
        ChainError::Decode(err.to_string())
    }
}

/// 트랜잭션 준비 에러
///
/// 검증 에러는 RPC 호출 전에 발생해야 함
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid book status code: {0}")]
    InvalidStatus(u64),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// API 에러 타입
///
/// # Design Decision
///
/// 각 에러 variant는 적절한 HTTP 상태 코드에 매핑됨
/// - 클라이언트 에러: 4xx (잘못된 주소, 필수 필드 누락)
/// - 서버 에러: 5xx (노드/컨트랙트 불가, RPC 오류)
#[derive(Debug, Error)]
pub enum ApiError {
    // ============ 400 Bad Request ============
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ============ 404 Not Found ============
    #[error("Resource not found: {0}")]
    NotFound(String),

    // ============ 500 Internal Server Error ============
    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Internal server error")]
    InternalError,

    // ============ 503 Service Unavailable ============
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// API 에러 응답 구조
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// 단건 조회용 변환: revert 는 "해당 id 없음" 으로 해석
    pub fn lookup(resource: impl Into<String>, err: ChainError) -> Self {
        match err {
            ChainError::Reverted(reason) => {
                ApiError::NotFound(format!("{} ({})", resource.into(), reason))
            }
            other => other.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // 4xx 클라이언트 에러
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                msg.clone(),
                None,
            ),
            ApiError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} not found", resource),
                None,
            ),

            // 5xx 서버 에러
            ApiError::RpcError(msg) => {
                tracing::error!("RPC error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RPC_ERROR",
                    "Blockchain request failed".to_string(),
                    Some(msg.clone()),
                )
            }
            ApiError::InternalError => {
                tracing::error!("Internal error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(service) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                format!("{} is currently unavailable", service),
                None,
            ),
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// ChainError를 ApiError로 변환
impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::ContractsNotLoaded => {
                ApiError::ServiceUnavailable("Contracts (not loaded)".to_string())
            }
            ChainError::Unavailable(_) => {
                ApiError::ServiceUnavailable("Blockchain connection".to_string())
            }
            ChainError::Reverted(reason) => ApiError::RpcError(format!("reverted: {}", reason)),
            ChainError::Decode(msg) | ChainError::Rpc(msg) => ApiError::RpcError(msg),
        }
    }
}

/// PrepareError를 ApiError로 변환
impl From<PrepareError> for ApiError {
    fn from(err: PrepareError) -> Self {
        match err {
            PrepareError::InvalidAddress(_) => ApiError::ValidationError(err.to_string()),
            PrepareError::MissingField(_)
            | PrepareError::InvalidAmount(_)
            | PrepareError::InvalidStatus(_) => ApiError::BadRequest(err.to_string()),
            PrepareError::Chain(e) => e.into(),
        }
    }
}

/// 요청 body 파싱 실패 (잘못된 JSON, 필드 누락/타입 불일치, Content-Type)
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// 경로 파라미터 파싱 실패 (예: `/book/abc`)
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// anyhow 에러를 ApiError로 변환
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Anyhow error: {:?}", err);
        ApiError::InternalError
    }
}
