//! Library Chain API Library
//!
//! # Overview
//!
//! BookNFT / LibraryCore 컨트랙트 앞단의 얇은 HTTP 백엔드.
//! 체인 데이터를 읽어 화면용 레코드로 변환하고, 상태 변경은 지갑이 서명할
//! unsigned 트랜잭션으로만 준비함. 로컬 저장소 없음.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         API                              │
//! │                                                          │
//! │  ┌─────────┐  ┌──────────────────────────┐  ┌────────┐  │
//! │  │ Routes  │─▶│ Services                  │  │ Types  │  │
//! │  └─────────┘  │  catalog ─▶ projectors    │  └────────┘  │
//! │               │  transactions  status     │              │
//! │               │  ChainReader (trait)      │              │
//! │               └────────────┬─────────────┘              │
//! └────────────────────────────┼────────────────────────────┘
//!                              │ JSON-RPC
//!                              ▼
//!                  ┌──────────────────────────┐
//!                  │ BookNFT    LibraryCore   │
//!                  └──────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 에러 타입 및 처리
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 체인 조회, 레코드 변환, 트랜잭션 준비
//! - `types`: 공통 타입 정의 (응답 래퍼, 주소)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use library_chain_api::{config::Config, services::{ContractHandles, EthersChain}};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let contracts = ContractHandles::load(&config.contracts_file, &config.artifacts_dir);
//!     let chain = EthersChain::connect(&config.eth_rpc_url, contracts)?;
//!
//!     // ... 서버 시작
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{ApiError, ChainError, PrepareError};
pub use services::{ChainReader, EthersChain};

/// 애플리케이션 전역 상태
///
/// 요청 간 공유되는 것은 읽기 전용 컨트랙트 핸들과 provider 뿐
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<dyn ChainReader>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(chain: Arc<dyn ChainReader>, config: Config) -> Self {
        Self {
            chain,
            config: Arc::new(config),
        }
    }
}
