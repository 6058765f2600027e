//! Common Types Module
//!
//! 애플리케이션 전반에서 사용되는 공통 타입 정의

use std::fmt;

use ethers::types::Address;
use serde::Serialize;
use sha3::{Digest, Keccak256};

/// API 응답 래퍼
///
/// 모든 성공 응답은 `{ "success": true, "data": ... }` 형태.
/// 실패 응답은 `error::ErrorResponse` (`{ "success": false, "error", "code" }`)
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Ethereum 주소 타입
///
/// 파싱 규칙:
/// - `0x` + 40자리 hex
/// - 전부 소문자/전부 대문자면 체크섬 검사 생략
/// - 대소문자 혼합이면 EIP-55 체크섬과 일치해야 함
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthAddress(Address);

impl EthAddress {
    pub fn parse(addr: &str) -> Result<Self, String> {
        let addr = addr.trim();
        let hex_part = addr
            .strip_prefix("0x")
            .ok_or_else(|| format!("{} is missing the 0x prefix", addr))?;

        if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("{} is not a 20-byte hex address", addr));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex_part, &mut bytes)
            .map_err(|e| format!("{}: {}", addr, e))?;
        let parsed = Self(Address::from(bytes));

        let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && parsed.checksummed() != addr {
            return Err(format!("{} has an invalid EIP-55 checksum", addr));
        }

        Ok(parsed)
    }

    pub fn as_address(&self) -> Address {
        self.0
    }

    /// EIP-55 체크섬 표기
    pub fn checksummed(&self) -> String {
        to_checksum(&self.0)
    }
}

impl From<Address> for EthAddress {
    fn from(addr: Address) -> Self {
        Self(addr)
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.checksummed())
    }
}

impl Serialize for EthAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.checksummed())
    }
}

/// EIP-55: keccak256(lowercase hex)의 nibble >= 8 이면 대문자
pub fn to_checksum(addr: &Address) -> String {
    let lower = hex::encode(addr.as_bytes());
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
