//! Book Projector
//!
//! `BookNFT.getBookInfo` 의 원시 튜플을 화면용 레코드로 변환하는 순수 함수 모음.
//!
//! ```text
//! (title, description, status, condition, createdAt, imgBefore, imgAfter)
//!        │
//!        ▼
//! BookRecord { status label, condition label, conditionPercent, author, priceEth, ... }
//! ```
//!
//! RPC 호출 없음. 실패하지 않음.

use serde::Serialize;

use crate::services::loan_projector::LoanRecord;
use crate::types::EthAddress;

/// 1 ETH ≈ 25,000,000 VND (고정 환율, 오라클 아님)
pub const VND_PER_ETH: f64 = 25_000_000.0;

const PRICE_STEP_ETH: f64 = 0.01;

/// 온체인 BookStatus enum (uint8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    Available,
    Borrowed,
    Damaged,
    Lost,
    Old,
    New,
    Unknown(u64),
}

impl BookStatus {
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => Self::Available,
            1 => Self::Borrowed,
            2 => Self::Damaged,
            3 => Self::Lost,
            4 => Self::Old,
            5 => Self::New,
            other => Self::Unknown(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Borrowed => "Borrowed",
            Self::Damaged => "Damaged",
            Self::Lost => "Lost",
            Self::Old => "Old",
            Self::New => "New",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// 온체인 Condition enum (uint8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookCondition {
    New,
    Good,
    Fair,
    Poor,
    Unknown(u64),
}

impl BookCondition {
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => Self::New,
            1 => Self::Good,
            2 => Self::Fair,
            3 => Self::Poor,
            other => Self::Unknown(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// 상태 등급 → 보존율 구간
    pub fn percent_bucket(&self) -> &'static str {
        match self {
            Self::New => "95-100%",
            Self::Good => "80-95%",
            Self::Fair => "60-80%",
            Self::Poor => "20-60%",
            Self::Unknown(_) => "0-20%",
        }
    }
}

/// `getBookInfo` 반환값
///
/// 구버전 컨트랙트는 이미지 해시 2개를 반환하지 않음 → 빈 문자열
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawBook {
    pub title: String,
    pub description: String,
    pub status: u64,
    pub condition: u64,
    pub created_at: u64,
    pub image_before_hash: String,
    pub image_after_hash: String,
}

/// 도서 조회 응답 레코드
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub author: String,
    pub status: &'static str,
    pub status_num: u64,
    pub condition: &'static str,
    pub condition_num: u64,
    pub condition_percent: &'static str,
    pub created_at: u64,
    pub image_before_hash: String,
    pub image_after_hash: String,
    pub owner: EthAddress,
    pub price_eth: f64,
    #[serde(rename = "priceVND")]
    pub price_vnd: f64,
    pub available: bool,
    pub borrowed: bool,
    /// Borrowed 상태일 때만 채워짐
    pub loan_info: Option<LoanRecord>,
}

impl BookRecord {
    pub fn status(&self) -> BookStatus {
        BookStatus::from_code(self.status_num)
    }
}

/// 원시 튜플 → BookRecord
///
/// `loan_info` 는 항상 `None` 으로 시작. 대출 정보는 호출자가 채움
pub fn project_book(id: u64, raw: RawBook, owner: EthAddress) -> BookRecord {
    let status = BookStatus::from_code(raw.status);
    let condition = BookCondition::from_code(raw.condition);
    let author = extract_author(&raw.description);
    let price_eth = price_eth(id);

    BookRecord {
        id,
        title: raw.title,
        author,
        description: raw.description,
        status: status.label(),
        status_num: raw.status,
        condition: condition.label(),
        condition_num: raw.condition,
        condition_percent: condition.percent_bucket(),
        created_at: raw.created_at,
        image_before_hash: raw.image_before_hash,
        image_after_hash: raw.image_after_hash,
        owner,
        price_eth,
        price_vnd: price_vnd(price_eth),
        available: status == BookStatus::Available,
        borrowed: status == BookStatus::Borrowed,
        loan_info: None,
    }
}

/// description 에서 저자 추출
///
/// `"| Author:"` 를 먼저 찾고, 없으면 `"Author:"`.
/// 마지막 marker 뒤 텍스트를 trim. 둘 다 없으면 `"Unknown"`
pub fn extract_author(description: &str) -> String {
    const MARKERS: [&str; 2] = ["| Author:", "Author:"];

    MARKERS
        .iter()
        .find_map(|marker| {
            description
                .rfind(marker)
                .map(|pos| description[pos + marker.len()..].trim().to_string())
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

/// 임시 가격 공식: (id + 1) * 0.01 ETH
pub fn price_eth(id: u64) -> f64 {
    (id as f64 + 1.0) * PRICE_STEP_ETH
}

pub fn price_vnd(price_eth: f64) -> f64 {
    price_eth * VND_PER_ETH
}
