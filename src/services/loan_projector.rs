//! Loan Projector
//!
//! `LibraryCore.loanInfos(bookId)` 결과를 응답 레코드로 변환.
//! Borrowed 상태인 도서에 대해서만 의미가 있음.

use ethers::types::U256;
use serde::Serialize;

use crate::error::ChainError;
use crate::services::book_projector::BookStatus;
use crate::types::EthAddress;

/// `loanInfos` 반환값
///
/// 구버전 컨트랙트는 statusAtLoan / statusAtReturn 이 없음 → 0
#[derive(Debug, Clone, PartialEq)]
pub struct RawLoan {
    pub borrower: EthAddress,
    pub borrowed_at: u64,
    pub due_date: u64,
    pub deposit: U256,
    pub is_returned: bool,
    pub status_at_loan: u64,
    pub status_at_return: u64,
}

/// 대출 정보 응답
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub borrower: EthAddress,
    pub borrowed_at: u64,
    pub due_date: u64,
    /// wei, 10진 문자열 (JS number 정밀도 손실 방지)
    pub deposit: String,
    pub is_returned: bool,
    pub status_at_loan: u64,
    pub status_at_return: u64,
}

impl From<RawLoan> for LoanRecord {
    fn from(raw: RawLoan) -> Self {
        Self {
            borrower: raw.borrower,
            borrowed_at: raw.borrowed_at,
            due_date: raw.due_date,
            deposit: raw.deposit.to_string(),
            is_returned: raw.is_returned,
            status_at_loan: raw.status_at_loan,
            status_at_return: raw.status_at_return,
        }
    }
}

/// 도서 상태 + 대출 조회 결과 → loanInfo
///
/// - Borrowed 가 아니면 대출 데이터와 무관하게 `None`
/// - 조회 실패는 삼키고 `None` (목록/상세 조회를 중단시키지 않음)
pub fn project_loan(status: BookStatus, loan: Result<RawLoan, ChainError>) -> Option<LoanRecord> {
    if status != BookStatus::Borrowed {
        return None;
    }

    match loan {
        Ok(raw) => Some(raw.into()),
        Err(e) => {
            tracing::debug!("loan info unavailable, reporting null: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_loan() -> RawLoan {
        RawLoan {
            borrower: EthAddress::parse("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap(),
            borrowed_at: 1_700_000_000,
            due_date: 1_701_209_600,
            // u64 범위를 넘는 deposit
            deposit: U256::from_dec_str("123456789012345678901234567890").unwrap(),
            is_returned: false,
            status_at_loan: 0,
            status_at_return: 0,
        }
    }

    #[test]
    fn test_not_borrowed_returns_none() {
        for status in [
            BookStatus::Available,
            BookStatus::Damaged,
            BookStatus::Lost,
            BookStatus::Old,
            BookStatus::New,
            BookStatus::Unknown(42),
        ] {
            assert!(project_loan(status, Ok(raw_loan())).is_none());
        }
    }

    #[test]
    fn test_borrowed_projects_loan() {
        let loan = project_loan(BookStatus::Borrowed, Ok(raw_loan())).unwrap();
        assert_eq!(loan.deposit, "123456789012345678901234567890");
        assert_eq!(loan.due_date, 1_701_209_600);
        assert!(!loan.is_returned);
    }

    #[test]
    fn test_failed_read_is_suppressed() {
        let loan = project_loan(
            BookStatus::Borrowed,
            Err(ChainError::Reverted("execution reverted".into())),
        );
        assert!(loan.is_none());
    }

    #[test]
    fn test_loan_json_shape() {
        let loan: LoanRecord = raw_loan().into();
        let json = serde_json::to_value(&loan).unwrap();
        assert_eq!(json["borrower"], "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359");
        assert_eq!(json["deposit"], "123456789012345678901234567890");
        assert_eq!(json["isReturned"], false);
        assert_eq!(json["statusAtLoan"], 0);
    }
}
