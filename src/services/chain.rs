//! Chain Reader
//!
//! 노드/컨트랙트 조회 인터페이스.
//!
//! # Features
//! - 노드 상태 (연결, chain id, block, gas price, nonce, balance)
//! - BookNFT / LibraryCore 읽기 전용 호출
//! - 상태 변경 호출의 ABI 인코딩 (서명/전송 없음)
//!
//! 모든 메서드는 자동 재시도 없이 1회 호출. 실패 처리는 호출자 몫.

use async_trait::async_trait;
use ethers::types::{Address, Bytes, U256};
use serde::Serialize;

use crate::error::ChainError;
use crate::services::book_projector::RawBook;
use crate::services::contracts::{ContractKind, Deployment};
use crate::services::loan_projector::RawLoan;
use crate::types::EthAddress;

/// 상태 변경 컨트랙트 호출
#[derive(Debug, Clone, PartialEq)]
pub enum ContractCall {
    /// BookNFT.mintBook(name, description, status)
    MintBook {
        name: String,
        description: String,
        status: u8,
    },
    /// LibraryCore.borrowBook(bookId)
    BorrowBook { book_id: u64 },
    /// LibraryCore.returnBook(bookId, returnStatus)
    ReturnBook { book_id: u64, return_status: u8 },
}

impl ContractCall {
    pub fn method(&self) -> &'static str {
        match self {
            Self::MintBook { .. } => "mintBook",
            Self::BorrowBook { .. } => "borrowBook",
            Self::ReturnBook { .. } => "returnBook",
        }
    }

    pub fn target(&self) -> ContractKind {
        match self {
            Self::MintBook { .. } => ContractKind::BookNft,
            Self::BorrowBook { .. } | Self::ReturnBook { .. } => ContractKind::LibraryCore,
        }
    }
}

/// ABI 인코딩 결과
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCall {
    pub to: Address,
    pub data: Bytes,
}

/// NFT 컬렉션 메타데이터
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    pub name: String,
    pub symbol: String,
    pub address: EthAddress,
}

/// 체인 조회 인터페이스
///
/// 프로덕션: `EthersChain` (JSON-RPC)
/// 테스트: `mock::MockChain`
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// 노드 연결 확인 (point-in-time)
    async fn is_connected(&self) -> bool;

    async fn chain_id(&self) -> Result<u64, ChainError>;

    async fn block_number(&self) -> Result<u64, ChainError>;

    /// wei
    async fn gas_price(&self) -> Result<u128, ChainError>;

    /// nonce (pending 미포함, latest 기준)
    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError>;

    /// ETH 잔액 (wei)
    async fn balance(&self, address: Address) -> Result<U256, ChainError>;

    /// 컨트랙트 로드 상태. `None` = 로드 실패
    fn deployment(&self) -> Option<&Deployment>;

    async fn collection_info(&self) -> Result<CollectionInfo, ChainError>;

    async fn next_book_id(&self) -> Result<u64, ChainError>;

    async fn book_info(&self, book_id: u64) -> Result<RawBook, ChainError>;

    async fn owner_of(&self, book_id: u64) -> Result<EthAddress, ChainError>;

    async fn loan_info(&self, book_id: u64) -> Result<RawLoan, ChainError>;

    /// BookNFT.balanceOf
    async fn nft_balance(&self, owner: Address) -> Result<U256, ChainError>;

    /// 로컬 ABI 인코딩 (RPC 없음)
    fn encode_call(&self, call: &ContractCall) -> Result<EncodedCall, ChainError>;
}
