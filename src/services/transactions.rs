//! Transaction Preparer
//!
//! 지갑 서명용 unsigned 트랜잭션 생성. 서명/전송은 하지 않음.
//!
//! # Flow
//!
//! 1. 주소 / 필수 필드 검증 (RPC 호출 전, 실패 시 즉시 반환)
//! 2. 로드된 ABI 로 calldata 인코딩
//! 3. nonce, gas price 조회 (읽기 전용)
//! 4. 액션별 고정 gas limit 으로 요청 조립
//!
//! 반환된 nonce 는 조회 시점 스냅샷. 지갑이 서명을 늦추면 stale 해질 수 있고,
//! 그 경우 노드가 전송 시점에 거부함 (여기서 재시도하지 않음).

use ethers::types::U256;
use serde::Serialize;

use crate::error::PrepareError;
use crate::services::book_projector::BookStatus;
use crate::services::chain::{ChainReader, ContractCall};
use crate::types::EthAddress;

pub const MINT_GAS_LIMIT: u64 = 300_000;
pub const LOAN_GAS_LIMIT: u64 = 200_000;

/// 상태 변경 액션
#[derive(Debug, Clone)]
pub enum TxAction {
    Mint {
        title: String,
        author: String,
        /// 없으면 title 사용
        description: Option<String>,
    },
    Borrow {
        book_id: u64,
        /// 보증금 (wei, 10진 문자열)
        deposit_wei: Option<String>,
    },
    Return {
        book_id: u64,
        /// 반납 시 도서 상태 (기본 0 = Available)
        return_status: Option<u64>,
    },
}

impl TxAction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mint { .. } => "mint",
            Self::Borrow { .. } => "borrow",
            Self::Return { .. } => "return",
        }
    }

    pub fn gas_limit(&self) -> u64 {
        match self {
            Self::Mint { .. } => MINT_GAS_LIMIT,
            Self::Borrow { .. } | Self::Return { .. } => LOAN_GAS_LIMIT,
        }
    }

    pub fn book_id(&self) -> Option<u64> {
        match self {
            Self::Mint { .. } => None,
            Self::Borrow { book_id, .. } | Self::Return { book_id, .. } => Some(*book_id),
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Self::Mint { .. } => "Transaction prepared. Sign with your wallet to add book.",
            Self::Borrow { .. } => "Borrow transaction prepared. Sign with your wallet.",
            Self::Return { .. } => "Return transaction prepared. Sign with your wallet.",
        }
    }
}

/// Unsigned 트랜잭션 (wallet 의 eth_sendTransaction 파라미터 형식)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: EthAddress,
    pub to: EthAddress,
    /// 0x-prefixed calldata
    pub data: String,
    /// wei, 10진 문자열
    pub value: String,
    pub gas: u64,
    pub gas_price: u128,
    pub nonce: u64,
}

/// 준비 결과
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedTransaction {
    pub action: &'static str,
    pub transaction: TransactionRequest,
    pub message: String,
    pub estimated_gas: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_id: Option<u64>,
}

/// 검증된 호출 + 첨부 금액
struct ValidatedAction {
    call: ContractCall,
    value: U256,
}

/// 트랜잭션 준비
pub async fn prepare(
    chain: &dyn ChainReader,
    action: TxAction,
    sender: &str,
) -> Result<PreparedTransaction, PrepareError> {
    // 1. 검증 (RPC 없음)
    let from = EthAddress::parse(sender).map_err(PrepareError::InvalidAddress)?;
    let validated = validate(&action)?;

    // 2. 인코딩 (로컬 ABI)
    let encoded = chain.encode_call(&validated.call)?;

    // 3. 노드 조회
    let nonce = chain.transaction_count(from.as_address()).await?;
    let gas_price = chain.gas_price().await?;

    tracing::info!(
        action = action.kind(),
        from = %from,
        nonce,
        "🧾 Prepared unsigned transaction"
    );

    Ok(PreparedTransaction {
        action: action.kind(),
        transaction: TransactionRequest {
            from,
            to: EthAddress::from(encoded.to),
            data: format!("0x{}", hex::encode(&encoded.data)),
            value: validated.value.to_string(),
            gas: action.gas_limit(),
            gas_price,
            nonce,
        },
        message: action.instruction().to_string(),
        estimated_gas: action.gas_limit(),
        book_id: action.book_id(),
    })
}

fn validate(action: &TxAction) -> Result<ValidatedAction, PrepareError> {
    match action {
        TxAction::Mint {
            title,
            author,
            description,
        } => {
            let title = title.trim();
            let author = author.trim();
            if title.is_empty() {
                return Err(PrepareError::MissingField("title"));
            }
            if author.is_empty() {
                return Err(PrepareError::MissingField("author"));
            }

            let base = description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or(title);

            Ok(ValidatedAction {
                call: ContractCall::MintBook {
                    name: title.to_string(),
                    description: mint_description(base, author),
                    status: 0,
                },
                value: U256::zero(),
            })
        }
        TxAction::Borrow {
            book_id,
            deposit_wei,
        } => {
            let value = match deposit_wei.as_deref().map(str::trim) {
                None | Some("") => U256::zero(),
                Some(raw) => U256::from_dec_str(raw)
                    .map_err(|_| PrepareError::InvalidAmount(raw.to_string()))?,
            };

            Ok(ValidatedAction {
                call: ContractCall::BorrowBook { book_id: *book_id },
                value,
            })
        }
        TxAction::Return {
            book_id,
            return_status,
        } => {
            let code = return_status.unwrap_or(0);
            if matches!(BookStatus::from_code(code), BookStatus::Unknown(_)) {
                return Err(PrepareError::InvalidStatus(code));
            }

            Ok(ValidatedAction {
                call: ContractCall::ReturnBook {
                    book_id: *book_id,
                    // from_code 로 0..=5 확인됨
                    return_status: code as u8,
                },
                value: U256::zero(),
            })
        }
    }
}

/// Book Projector 의 author 파싱과 짝을 이루는 표기
pub fn mint_description(description: &str, author: &str) -> String {
    format!("{} | Author: {}", description, author)
}
