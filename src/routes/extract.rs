//! Request Extractors
//!
//! axum 기본 extractor 의 rejection 은 plain text (Json 은 422 포함).
//! `ApiError` 로 변환해서 모든 실패 응답을 `{ success: false, error, code }` 400 으로 통일.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// `axum::Json` + ApiError rejection
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` + ApiError rejection
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
