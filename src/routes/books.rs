//! Book / Loan Endpoints
//!
//! # Interview Q&A
//!
//! Q: 목록 조회 중 일부 도서 조회가 실패하면?
//! A: 해당 id 만 건너뜀
//!    - 실패는 warn 로그로만 남기고 응답에는 포함하지 않음
//!    - totalBooks 는 nextBookId 그대로 (반환된 books 수와 다를 수 있음)
//!
//! Q: 존재하지 않는 book id 는 어떻게 판단?
//! A: getBookInfo / ownerOf revert → 404

use axum::{
    extract::State,
    Json,
};
use serde::Serialize;

use crate::{
    error::ApiError,
    routes::extract::ApiPath,
    services::{catalog, BookRecord, CollectionInfo, LoanRecord},
    types::ApiResponse,
    AppState,
};

/// 도서 목록 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListResponse {
    pub collection: CollectionInfo,
    /// 조회 시점 nextBookId
    pub total_books: u64,
    pub books: Vec<BookRecord>,
}

/// 대출 조회 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResponse {
    pub book_id: u64,
    #[serde(flatten)]
    pub loan: LoanRecord,
}

/// GET /api/blockchain/books
pub async fn list_books(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BookListResponse>>, ApiError> {
    let collection = state.chain.collection_info().await?;
    let scan = catalog::scan_books(state.chain.as_ref(), state.config.book_fetch_concurrency).await?;

    for (book_id, err) in scan.failures() {
        tracing::warn!(book_id, "⚠️ Skipping book: {}", err);
    }

    let total_books = scan.next_book_id;
    let books = scan.into_records();

    tracing::debug!("📚 Listed {} of {} books", books.len(), total_books);

    Ok(Json(ApiResponse::success(BookListResponse {
        collection,
        total_books,
        books,
    })))
}

/// GET /api/blockchain/book/:book_id
pub async fn get_book(
    State(state): State<AppState>,
    ApiPath(book_id): ApiPath<u64>,
) -> Result<Json<ApiResponse<BookRecord>>, ApiError> {
    let book = catalog::fetch_book(state.chain.as_ref(), book_id)
        .await
        .map_err(|e| ApiError::lookup(format!("Book {}", book_id), e))?;

    Ok(Json(ApiResponse::success(book)))
}

/// GET /api/blockchain/loan/:book_id
///
/// borrower 가 zero address 면 한 번도 대출된 적 없는 도서 → 404
pub async fn get_loan(
    State(state): State<AppState>,
    ApiPath(book_id): ApiPath<u64>,
) -> Result<Json<ApiResponse<LoanResponse>>, ApiError> {
    let raw = state
        .chain
        .loan_info(book_id)
        .await
        .map_err(|e| ApiError::lookup(format!("Loan for book {}", book_id), e))?;

    if raw.borrower.as_address().is_zero() {
        return Err(ApiError::NotFound(format!("Loan for book {}", book_id)));
    }

    Ok(Json(ApiResponse::success(LoanResponse {
        book_id,
        loan: raw.into(),
    })))
}
