//! Services Module
//!
//! 비즈니스 로직을 담당하는 서비스 레이어
//!
//! # Services
//! - `chain`: 노드/컨트랙트 조회 인터페이스 (`ChainReader`)
//! - `ethers_chain`: JSON-RPC 구현
//! - `contracts`: 배포 주소 + ABI 로더
//! - `book_projector` / `loan_projector`: 원시 튜플 → 응답 레코드
//! - `catalog`: 도서 단건/전체 조회
//! - `transactions`: unsigned 트랜잭션 준비
//! - `status`: 블록체인 상태 집계

pub mod book_projector;
pub mod catalog;
pub mod chain;
pub mod contracts;
pub mod ethers_chain;
pub mod loan_projector;
pub mod status;
pub mod transactions;

pub use book_projector::{BookRecord, BookStatus, BookCondition, RawBook};
pub use catalog::{BookScan, fetch_book, scan_books};
pub use chain::{ChainReader, CollectionInfo, ContractCall, EncodedCall};
pub use contracts::{ContractHandles, ContractKind, Deployment, LibraryContracts};
pub use ethers_chain::EthersChain;
pub use loan_projector::{LoanRecord, RawLoan};
pub use status::BlockchainStatus;
pub use transactions::{PreparedTransaction, TransactionRequest, TxAction};
