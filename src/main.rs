//! Library Chain API Server
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Client (Frontend + Wallet)                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum Web Server                         │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                      Routes Layer                        ││
//! │  │  /health  /api/blockchain/*  /api/transactions/*        ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Services Layer                        ││
//! │  │  Catalog    Projectors    TxPreparer    Status          ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Chain Layer                           ││
//! │  │  EthersChain (JSON-RPC)    ContractHandles (ABI)        ││
//! │  └─────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Smart Contracts (Ethereum)                │
//! │  BookNFT (ERC-721)    LibraryCore                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// 라이브러리에서 가져오기
use library_chain_api::{
    routes,
    services::{ChainReader, ContractHandles, EthersChain},
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    // RUST_LOG=debug,tower_http=info 형태로 레벨 제어 가능
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "library_chain_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting Library Chain API Server");

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("📋 Configuration loaded");

    // 컨트랙트 로드 (실패해도 degraded 모드로 계속)
    let contracts = ContractHandles::load(&config.contracts_file, &config.artifacts_dir);

    // 노드 연결
    let chain = EthersChain::connect(&config.eth_rpc_url, contracts)?;
    if chain.is_connected().await {
        tracing::info!("⛓️  Connected to blockchain at {}", config.eth_rpc_url);
    } else {
        tracing::warn!("⚠️  Blockchain node unreachable at {}, serving degraded", config.eth_rpc_url);
    }

    // 앱 상태 구성
    let port = config.port;
    let state = AppState::new(Arc::new(chain), config);

    // 라우터 구성
    let app = create_app(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🌐 Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 라우터 + 미들웨어
fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// 개발 환경 허용 origin
const DEV_ORIGINS: [&str; 6] = [
    "http://localhost:5173", // Vite dev server
    "http://localhost:3000",
    "http://localhost:5000", // Flask 프론트엔드
    "http://127.0.0.1:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5000",
];

/// CORS 설정
///
/// 프로덕션: `ALLOWED_ORIGINS` (콤마 구분) 만 허용
/// 개발: localhost 허용
fn cors_layer(config: &Config) -> CorsLayer {
    if config.is_production() {
        let allowed_origins = std::env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        if origins.is_empty() {
            tracing::warn!("⚠️  ALLOWED_ORIGINS is empty, cross-origin requests will be rejected");
        }
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = DEV_ORIGINS
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    async fn allowed_origin(origin: &str) -> Option<HeaderValue> {
        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .layer(cors_layer(&Config::default()));

        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn test_dev_cors_allows_flask_frontend() {
        for origin in ["http://localhost:5000", "http://127.0.0.1:5000", "http://localhost:5173"] {
            assert_eq!(
                allowed_origin(origin).await,
                Some(HeaderValue::from_static(origin)),
                "{}",
                origin
            );
        }
    }

    #[tokio::test]
    async fn test_dev_cors_rejects_unknown_origin() {
        assert!(allowed_origin("http://evil.example").await.is_none());
    }
}
