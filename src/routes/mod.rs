//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Routes
//! - `/health` - 헬스 체크
//! - `/api/blockchain/*` - 노드 상태, 도서/대출/계정 조회
//! - `/api/nft/*` - NFT 잔액
//! - `/api/contracts` - 배포 주소
//! - `/api/transactions/*` - unsigned 트랜잭션 준비

pub mod accounts;
pub mod books;
pub mod contracts;
pub mod extract;
pub mod health;
pub mod status;
pub mod transactions;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// 라우터 생성 (미들웨어 제외)
///
/// # Route Structure
///
/// ```text
/// GET  /health                          - 서버 상태 확인
///
/// GET  /api/blockchain/status           - 노드 / 컨트랙트 상태
/// GET  /api/blockchain/books            - 전체 도서 목록
/// GET  /api/blockchain/book/:book_id    - 도서 단건 (+ 대출 정보)
/// GET  /api/blockchain/loan/:book_id    - 대출 정보
/// GET  /api/blockchain/account/:address - ETH 잔액
/// GET  /api/nft/balance/:address        - 보유 NFT 수
/// GET  /api/contracts                   - 배포 주소
///
/// POST /api/transactions/mint           - 도서 등록 트랜잭션 준비
/// POST /api/transactions/borrow         - 대출 트랜잭션 준비
/// POST /api/transactions/return         - 반납 트랜잭션 준비
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/", get(health::health_check))
        .route("/health", get(health::health_check))

        // Chain reads
        .route("/api/blockchain/status", get(status::blockchain_status))
        .route("/api/blockchain/books", get(books::list_books))
        .route("/api/blockchain/book/:book_id", get(books::get_book))
        .route("/api/blockchain/loan/:book_id", get(books::get_loan))
        .route("/api/blockchain/account/:address", get(accounts::get_account))
        .route("/api/nft/balance/:address", get(accounts::get_nft_balance))
        .route("/api/contracts", get(contracts::get_contracts))

        // Transaction preparation
        .route("/api/transactions/mint", post(transactions::prepare_mint))
        .route("/api/transactions/borrow", post(transactions::prepare_borrow))
        .route("/api/transactions/return", post(transactions::prepare_return))

        // 상태 주입
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::services::chain::mock::MockChain;

    const OWNER: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    fn app(chain: MockChain) -> (Router, Arc<MockChain>) {
        let chain = Arc::new(chain);
        let state = AppState::new(chain.clone(), Config::default());
        (create_router(state), chain)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_running() {
        let (app, _) = app(MockChain::new());
        let (status, body) = send(app, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
        assert_eq!(body["blockchainConnected"], true);
        assert_eq!(body["chainId"], 31337);
    }

    #[tokio::test]
    async fn test_health_degraded_without_contracts() {
        let (app, _) = app(MockChain::without_contracts());
        let (status, body) = send(app, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["contractsLoaded"], false);
    }

    #[tokio::test]
    async fn test_status_disconnected_is_503() {
        let (app, _) = app(MockChain::disconnected());
        let (status, body) = send(app, get("/api/blockchain/status")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["connected"], false);
        assert!(body.get("chainId").is_none());
        assert!(body.get("latestBlock").is_none());
    }

    #[tokio::test]
    async fn test_status_connected() {
        let (app, _) = app(MockChain::new());
        let (status, body) = send(app, get("/api/blockchain/status")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["latestBlock"], 42);
        assert_eq!(body["availableContracts"], json!(["bookNFT", "libraryCore"]));
    }

    #[tokio::test]
    async fn test_list_books_skips_failures() {
        let chain = MockChain::new()
            .with_book(0, "Intro | Author: Alice", 0)
            .with_book(1, "Broken", 0)
            .with_book(2, "Rust | Author: Bob", 1)
            .with_loan(2, 10_000_000_000_000_000)
            .failing(1);
        let (app, _) = app(chain);

        let (status, body) = send(app, get("/api/blockchain/books")).await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["totalBooks"], 3);
        assert_eq!(data["collection"]["symbol"], "LBOOK");

        let books = data["books"].as_array().unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0]["id"], 0);
        assert_eq!(books[0]["author"], "Alice");
        assert_eq!(books[0]["loanInfo"], Value::Null);
        assert_eq!(books[1]["id"], 2);
        assert_eq!(books[1]["loanInfo"]["deposit"], "10000000000000000");
    }

    #[tokio::test]
    async fn test_list_books_without_contracts_is_503() {
        let (app, _) = app(MockChain::without_contracts());
        let (status, body) = send(app, get("/api/blockchain/books")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_get_book() {
        let (app, _) = app(MockChain::new().with_book(3, "Dune | Author: Herbert", 0));
        let (status, body) = send(app, get("/api/blockchain/book/3")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], 3);
        assert_eq!(body["data"]["author"], "Herbert");
        assert_eq!(body["data"]["priceEth"], 0.04);
    }

    #[tokio::test]
    async fn test_get_missing_book_is_404() {
        let (app, _) = app(MockChain::new());
        let (status, body) = send(app, get("/api/blockchain/book/99")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_book_when_node_down_is_503() {
        let (app, _) = app(MockChain::disconnected().with_book(0, "A", 0));
        let (status, _) = send(app, get("/api/blockchain/book/0")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_get_loan() {
        let chain = MockChain::new()
            .with_book(5, "E", 1)
            .with_loan(5, 20_000_000_000_000_000);
        let (app, _) = app(chain);

        let (status, body) = send(app, get("/api/blockchain/loan/5")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["bookId"], 5);
        assert_eq!(body["data"]["deposit"], "20000000000000000");
        assert_eq!(body["data"]["isReturned"], false);
    }

    #[tokio::test]
    async fn test_get_missing_loan_is_404() {
        let (app, _) = app(MockChain::new());
        let (status, _) = send(app, get("/api/blockchain/loan/1")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_account_balance() {
        let (app, _) = app(MockChain::new());
        let uri = format!("/api/blockchain/account/{}", OWNER);
        let (status, body) = send(app, get(&uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["address"], OWNER);
        assert_eq!(body["data"]["balanceWei"], "1500000000000000000");
        assert!(body["data"]["balance"].as_str().unwrap().starts_with("1.5"));
    }

    #[tokio::test]
    async fn test_account_invalid_address_is_400() {
        let (app, chain) = app(MockChain::new());
        let (status, body) = send(app, get("/api/blockchain/account/0x1234")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(chain.rpc_calls(), 0);
    }

    #[tokio::test]
    async fn test_nft_balance() {
        let chain = MockChain::new().with_book(0, "A", 0).with_book(1, "B", 0);
        let owner = chain.owners[&0].to_string();
        let (app, _) = app(chain);

        let (status, body) = send(app, get(&format!("/api/nft/balance/{}", owner))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["balance"], "2");
    }

    #[tokio::test]
    async fn test_contracts() {
        let (app, _) = app(MockChain::new());
        let (status, body) = send(app, get("/api/contracts")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["chainId"], 31337);
        assert_eq!(body["data"]["network"], "localhost");
        assert!(body["data"]["contracts"]["bookNFT"].is_string());
        assert!(body["data"]["contracts"]["libraryCore"].is_string());
    }

    #[tokio::test]
    async fn test_contracts_not_loaded_is_503() {
        let (app, _) = app(MockChain::without_contracts());
        let (status, _) = send(app, get("/api/contracts")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_prepare_mint() {
        let (app, _) = app(MockChain::new());
        let request = post_json(
            "/api/transactions/mint",
            json!({ "title": "Dune", "author": "Frank Herbert", "owner": OWNER }),
        );

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["action"], "mint");
        assert_eq!(data["estimatedGas"], 300_000);
        assert_eq!(data["transaction"]["from"], OWNER);
        assert_eq!(data["transaction"]["nonce"], 7);
        assert_eq!(data["transaction"]["value"], "0");
    }

    #[tokio::test]
    async fn test_prepare_mint_missing_author_makes_no_rpc() {
        let (app, chain) = app(MockChain::new());
        let request = post_json(
            "/api/transactions/mint",
            json!({ "title": "Dune", "owner": OWNER }),
        );

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(chain.rpc_calls(), 0);
    }

    #[tokio::test]
    async fn test_prepare_borrow_with_deposit() {
        let (app, _) = app(MockChain::new());
        let request = post_json(
            "/api/transactions/borrow",
            json!({ "bookId": 2, "borrower": OWNER, "depositWei": "10000000000000000" }),
        );

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["bookId"], 2);
        assert_eq!(body["data"]["estimatedGas"], 200_000);
        assert_eq!(body["data"]["transaction"]["value"], "10000000000000000");
    }

    #[tokio::test]
    async fn test_prepare_return_invalid_status_is_400() {
        let (app, chain) = app(MockChain::new());
        let request = post_json(
            "/api/transactions/return",
            json!({ "bookId": 2, "borrower": OWNER, "returnStatus": 9 }),
        );

        let (status, _) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(chain.rpc_calls(), 0);
    }

    #[tokio::test]
    async fn test_prepare_when_node_down_is_503() {
        let (app, _) = app(MockChain::disconnected());
        let request = post_json(
            "/api/transactions/return",
            json!({ "bookId": 2, "borrower": OWNER }),
        );

        let (status, _) = send(app, request).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_borrow_missing_book_id_is_400_envelope() {
        let (app, chain) = app(MockChain::new());
        let request = post_json("/api/transactions/borrow", json!({ "borrower": OWNER }));

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body["error"].as_str().unwrap().contains("bookId"));
        assert_eq!(chain.rpc_calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400_envelope() {
        let (app, _) = app(MockChain::new());
        let request = Request::builder()
            .method("POST")
            .uri("/api/transactions/mint")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ \"title\": "))
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_non_numeric_book_id_is_400_envelope() {
        let (app, chain) = app(MockChain::new());
        let (status, body) = send(app, get("/api/blockchain/book/abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(chain.rpc_calls(), 0);
    }
}
