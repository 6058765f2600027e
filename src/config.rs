//! Configuration Module
//!
//! # Interview Q&A
//!
//! Q: 환경변수 vs 설정 파일, 어떤 방식을 선택했고 왜인가?
//! A: 환경변수를 선택
//!    - 컨트랙트 배포 경로, RPC URL이 환경(로컬 Hardhat / 테스트넷)마다 다름
//!    - `.env` 파일은 dotenvy로 로드 (개발 편의)
//!
//! Q: 컨트랙트 파일이 없으면 시작 실패해야 하는가?
//! A: 아니오. 설정 값 파싱 오류만 fail-fast
//!    - contracts.json / ABI 누락은 degraded 모드로 시작 (503 응답)
//!    - 배포 전에도 /health, /api/blockchain/status 는 동작해야 함

use std::env;
use std::path::PathBuf;
use anyhow::{Context, Result};

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트 (기본값: 8001)
    pub port: u16,

    /// Ethereum JSON-RPC URL (Hardhat node 기본값)
    pub eth_rpc_url: String,

    /// 배포 결과 파일 (`{"bookNFT": "0x..", "libraryCore": "0x.."}`)
    pub contracts_file: PathBuf,

    /// Hardhat artifacts 디렉토리 (`<Name>.sol/<Name>.json`)
    pub artifacts_dir: PathBuf,

    /// /api/contracts 에 보고되는 체인 ID
    pub chain_id: u64,

    /// /api/contracts 에 보고되는 네트워크 이름
    pub network_name: String,

    /// 도서 목록 조회 시 동시 RPC 호출 수
    pub book_fetch_concurrency: usize,

    /// 환경 (development, staging, production)
    pub environment: Environment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    /// 환경변수에서 설정 로드
    ///
    /// # Optional Environment Variables
    ///
    /// - `PORT`: 서버 포트 (기본값: 8001)
    /// - `ETH_RPC_URL`: Ethereum RPC URL (기본값: http://127.0.0.1:8545)
    /// - `CONTRACTS_FILE`: 배포 주소 파일 (기본값: web/contracts.json)
    /// - `ARTIFACTS_DIR`: 컴파일된 ABI 디렉토리 (기본값: artifacts/contracts)
    /// - `CHAIN_ID`: 기본값 31337 (Hardhat)
    /// - `NETWORK_NAME`: 기본값 localhost
    /// - `BOOK_FETCH_CONCURRENCY`: 기본값 8
    /// - `ENVIRONMENT`: development | staging | production
    pub fn from_env() -> Result<Self> {
        let environment = match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let book_fetch_concurrency: usize = env::var("BOOK_FETCH_CONCURRENCY")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .context("BOOK_FETCH_CONCURRENCY must be a valid number")?;

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8001".to_string())
                .parse()
                .context("PORT must be a valid number")?,

            eth_rpc_url: env::var("ETH_RPC_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8545".to_string()),

            contracts_file: env::var("CONTRACTS_FILE")
                .unwrap_or_else(|_| "web/contracts.json".to_string())
                .into(),

            artifacts_dir: env::var("ARTIFACTS_DIR")
                .unwrap_or_else(|_| "artifacts/contracts".to_string())
                .into(),

            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| "31337".to_string())
                .parse()
                .context("CHAIN_ID must be a valid number")?,

            network_name: env::var("NETWORK_NAME")
                .unwrap_or_else(|_| "localhost".to_string()),

            // 0이면 stream이 진행되지 않으므로 최소 1
            book_fetch_concurrency: book_fetch_concurrency.max(1),

            environment,
        })
    }

    /// 프로덕션 환경인지 확인
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8001,
            eth_rpc_url: "http://127.0.0.1:8545".to_string(),
            contracts_file: "web/contracts.json".into(),
            artifacts_dir: "artifacts/contracts".into(),
            chain_id: 31337,
            network_name: "localhost".to_string(),
            book_fetch_concurrency: 8,
            environment: Environment::Development,
        }
    }
}
