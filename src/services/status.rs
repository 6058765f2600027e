//! Status Aggregator
//!
//! 노드 연결 + 컨트랙트 로드 상태를 하나의 객체로 보고.
//! 호출마다 새로 조회 (캐시/재시도 없음).

use serde::Serialize;

use crate::error::ChainError;
use crate::services::chain::ChainReader;
use crate::services::contracts::ContractKind;

/// 블록체인 상태
///
/// 연결 끊김 시 chainId / latestBlock / gasPrice 키 자체를 생략 (null 아님)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainStatus {
    pub connected: bool,
    pub contracts_loaded: bool,
    pub available_contracts: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 현재 상태 조회
///
/// 연결된 상태에서 chain id / block 조회가 실패하면 에러 전파
pub async fn probe(chain: &dyn ChainReader, rpc_url: &str) -> Result<BlockchainStatus, ChainError> {
    let (contracts_loaded, available_contracts) = match chain.deployment() {
        Some(_) => (true, ContractKind::ALL.iter().map(ContractKind::key).collect()),
        None => (false, Vec::new()),
    };

    if !chain.is_connected().await {
        return Ok(BlockchainStatus {
            connected: false,
            contracts_loaded,
            available_contracts,
            chain_id: None,
            latest_block: None,
            gas_price: None,
            rpc_url: None,
            error: Some("Not connected to blockchain".to_string()),
        });
    }

    Ok(BlockchainStatus {
        connected: true,
        contracts_loaded,
        available_contracts,
        chain_id: Some(chain.chain_id().await?),
        latest_block: Some(chain.block_number().await?),
        gas_price: Some(chain.gas_price().await?),
        rpc_url: Some(rpc_url.to_string()),
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::chain::mock::MockChain;

    const RPC: &str = "http://127.0.0.1:8545";

    #[tokio::test]
    async fn test_disconnected_omits_chain_fields() {
        let status = probe(&MockChain::disconnected(), RPC).await.unwrap();
        assert!(!status.connected);

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["connected"], false);
        assert!(json.get("chainId").is_none());
        assert!(json.get("latestBlock").is_none());
        assert!(json.get("gasPrice").is_none());
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn test_connected_reports_chain() {
        let status = probe(&MockChain::new(), RPC).await.unwrap();

        assert!(status.connected);
        assert!(status.contracts_loaded);
        assert_eq!(status.available_contracts, vec!["bookNFT", "libraryCore"]);
        assert_eq!(status.chain_id, Some(31337));
        assert_eq!(status.latest_block, Some(42));
        assert_eq!(status.rpc_url.as_deref(), Some(RPC));
    }

    #[tokio::test]
    async fn test_connected_without_contracts() {
        let status = probe(&MockChain::without_contracts(), RPC).await.unwrap();
        assert!(status.connected);
        assert!(!status.contracts_loaded);
        assert!(status.available_contracts.is_empty());
    }
}
