//! Contract Loader
//!
//! Hardhat 배포 결과(`contracts.json`)와 컴파일 산출물(`artifacts/`)에서
//! 컨트랙트 주소 + ABI 를 읽어 핸들을 구성.
//!
//! ```text
//! web/contracts.json                       → { bookNFT, libraryCore }
//! artifacts/contracts/BookNFT.sol/BookNFT.json         → { abi: [...] }
//! artifacts/contracts/LibraryCore.sol/LibraryCore.json → { abi: [...] }
//! ```
//!
//! 로드 실패 시 서버는 죽지 않고 `ContractHandles::NotLoaded` 로 시작함.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use ethers::abi::Abi;
use ethers::types::Address;
use serde::Serialize;
use serde_json::Value;

use crate::types::EthAddress;

/// 배포 대상 컨트랙트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    BookNft,
    LibraryCore,
}

impl ContractKind {
    pub const ALL: [ContractKind; 2] = [ContractKind::BookNft, ContractKind::LibraryCore];

    /// contracts.json 키
    pub fn key(&self) -> &'static str {
        match self {
            Self::BookNft => "bookNFT",
            Self::LibraryCore => "libraryCore",
        }
    }

    /// Hardhat artifact 이름
    fn artifact_name(&self) -> &'static str {
        match self {
            Self::BookNft => "BookNFT",
            Self::LibraryCore => "LibraryCore",
        }
    }
}

/// 배포된 컨트랙트 주소
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    #[serde(rename = "bookNFT")]
    pub book_nft: EthAddress,
    pub library_core: EthAddress,
}

impl Deployment {
    pub fn address_of(&self, kind: ContractKind) -> Address {
        match kind {
            ContractKind::BookNft => self.book_nft.as_address(),
            ContractKind::LibraryCore => self.library_core.as_address(),
        }
    }

    /// contracts.json 파싱 (추가 키는 무시)
    pub fn from_json(value: &Value) -> Result<Self> {
        let address = |kind: ContractKind| -> Result<EthAddress> {
            let raw = value
                .get(kind.key())
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow!("missing key `{}` in contracts file", kind.key()))?;
            // 배포 스크립트마다 대소문자 표기가 달라 체크섬 검사는 생략
            EthAddress::parse(&raw.to_lowercase())
                .map_err(|e| anyhow!("invalid `{}` address: {}", kind.key(), e))
        };

        Ok(Self {
            book_nft: address(ContractKind::BookNft)?,
            library_core: address(ContractKind::LibraryCore)?,
        })
    }
}

/// 주소 + ABI
#[derive(Debug, Clone)]
pub struct LibraryContracts {
    pub deployment: Deployment,
    pub book_nft_abi: Abi,
    pub library_core_abi: Abi,
}

impl LibraryContracts {
    pub fn handle(&self, kind: ContractKind) -> (Address, &Abi) {
        let abi = match kind {
            ContractKind::BookNft => &self.book_nft_abi,
            ContractKind::LibraryCore => &self.library_core_abi,
        };
        (self.deployment.address_of(kind), abi)
    }

    /// 파일 시스템에서 로드
    pub fn load(contracts_file: &Path, artifacts_dir: &Path) -> Result<Self> {
        let descriptor = read_json(contracts_file)?;
        let deployment = Deployment::from_json(&descriptor)
            .with_context(|| format!("bad deployment descriptor {}", contracts_file.display()))?;

        Ok(Self {
            deployment,
            book_nft_abi: load_abi(artifacts_dir, ContractKind::BookNft)?,
            library_core_abi: load_abi(artifacts_dir, ContractKind::LibraryCore)?,
        })
    }
}

/// 전역 캐시 대신 명시적 상태
#[derive(Debug, Clone)]
pub enum ContractHandles {
    Loaded(LibraryContracts),
    NotLoaded(String),
}

impl ContractHandles {
    /// 로드 실패는 경고만 남기고 NotLoaded 로 기록
    pub fn load(contracts_file: &Path, artifacts_dir: &Path) -> Self {
        match LibraryContracts::load(contracts_file, artifacts_dir) {
            Ok(contracts) => {
                tracing::info!(
                    book_nft = %contracts.deployment.book_nft,
                    library_core = %contracts.deployment.library_core,
                    "📚 Contracts loaded"
                );
                ContractHandles::Loaded(contracts)
            }
            Err(e) => {
                tracing::warn!("⚠️  Contracts not loaded: {:#}", e);
                tracing::warn!("   Deploy and compile contracts first (npm run deploy)");
                ContractHandles::NotLoaded(format!("{:#}", e))
            }
        }
    }

    pub fn loaded(&self) -> Option<&LibraryContracts> {
        match self {
            ContractHandles::Loaded(contracts) => Some(contracts),
            ContractHandles::NotLoaded(_) => None,
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn load_abi(artifacts_dir: &Path, kind: ContractKind) -> Result<Abi> {
    let name = kind.artifact_name();
    let path = artifacts_dir
        .join(format!("{}.sol", name))
        .join(format!("{}.json", name));

    let mut artifact = read_json(&path)?;
    let abi = artifact
        .get_mut("abi")
        .map(Value::take)
        .ok_or_else(|| anyhow!("{} has no `abi` field", path.display()))?;

    serde_json::from_value(abi).with_context(|| format!("{} has a malformed ABI", path.display()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::PathBuf;

    use super::*;

    pub fn dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
    }

    pub fn contracts() -> LibraryContracts {
        LibraryContracts::load(&dir().join("contracts.json"), &dir().join("artifacts"))
            .expect("fixture contracts load")
    }
}
