//! Book Catalog
//!
//! Chain Reader 호출 → Book/Loan Projector 연결.
//!
//! # Partial results
//!
//! 전체 목록 조회는 `[0, nextBookId)` 의 각 id 마다 독립적으로 조회함.
//! 한 id 의 실패가 나머지 조회를 취소하지 않음. 결과는 `(id, Result)` 목록으로
//! 반환되고, 실패를 로깅할지/셀지/무시할지는 호출자가 결정.

use futures_util::stream::{self, StreamExt};

use crate::error::ChainError;
use crate::services::book_projector::{project_book, BookRecord, BookStatus};
use crate::services::chain::ChainReader;
use crate::services::loan_projector::{project_loan, LoanRecord};

/// 전체 목록 조회 결과
#[derive(Debug)]
pub struct BookScan {
    /// 조회 시점의 nextBookId
    pub next_book_id: u64,
    /// id 오름차순
    pub outcomes: Vec<(u64, Result<BookRecord, ChainError>)>,
}

impl BookScan {
    pub fn records(&self) -> impl Iterator<Item = &BookRecord> {
        self.outcomes.iter().filter_map(|(_, r)| r.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (u64, &ChainError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, r)| r.as_ref().err().map(|e| (*id, e)))
    }

    /// 성공한 레코드만 소유권 이전
    pub fn into_records(self) -> Vec<BookRecord> {
        self.outcomes
            .into_iter()
            .filter_map(|(_, r)| r.ok())
            .collect()
    }
}

/// 도서 1권 조회 + 대출 정보
///
/// getBookInfo / ownerOf 실패는 전파, loanInfos 실패는 `loan_info = None`
pub async fn fetch_book(chain: &dyn ChainReader, book_id: u64) -> Result<BookRecord, ChainError> {
    let raw = chain.book_info(book_id).await?;
    let owner = chain.owner_of(book_id).await?;

    let mut record = project_book(book_id, raw, owner);
    record.loan_info = fetch_loan(chain, book_id, record.status()).await;

    Ok(record)
}

/// Borrowed 일 때만 loanInfos 호출
pub async fn fetch_loan(
    chain: &dyn ChainReader,
    book_id: u64,
    status: BookStatus,
) -> Option<LoanRecord> {
    if status != BookStatus::Borrowed {
        return None;
    }
    project_loan(status, chain.loan_info(book_id).await)
}

/// `[0, nextBookId)` 전체 조회
///
/// `concurrency` 개까지 동시에 조회하되 결과 순서는 id 순서 유지 (`buffered`)
pub async fn scan_books(
    chain: &dyn ChainReader,
    concurrency: usize,
) -> Result<BookScan, ChainError> {
    let next_book_id = chain.next_book_id().await?;

    let outcomes: Vec<(u64, Result<BookRecord, ChainError>)> = stream::iter(0..next_book_id)
        .map(|id| async move { (id, fetch_book(chain, id).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    Ok(BookScan {
        next_book_id,
        outcomes,
    })
}
