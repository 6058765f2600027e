//! Account Endpoints

use axum::{
    extract::State,
    Json,
};
use ethers::utils::format_ether;
use serde::Serialize;

use crate::{
    error::ApiError,
    routes::extract::ApiPath,
    types::{ApiResponse, EthAddress},
    AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub address: EthAddress,
    /// ETH 단위 10진 문자열
    pub balance: String,
    pub balance_wei: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NftBalanceResponse {
    pub address: EthAddress,
    pub balance: String,
}

fn parse_address(raw: &str) -> Result<EthAddress, ApiError> {
    EthAddress::parse(raw).map_err(ApiError::ValidationError)
}

/// GET /api/blockchain/account/:address
pub async fn get_account(
    State(state): State<AppState>,
    ApiPath(address): ApiPath<String>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let address = parse_address(&address)?;
    let wei = state.chain.balance(address.as_address()).await?;

    Ok(Json(ApiResponse::success(AccountResponse {
        address,
        balance: format_ether(wei),
        balance_wei: wei.to_string(),
    })))
}

/// GET /api/nft/balance/:address
pub async fn get_nft_balance(
    State(state): State<AppState>,
    ApiPath(address): ApiPath<String>,
) -> Result<Json<ApiResponse<NftBalanceResponse>>, ApiError> {
    let address = parse_address(&address)?;
    let balance = state.chain.nft_balance(address.as_address()).await?;

    Ok(Json(ApiResponse::success(NftBalanceResponse {
        address,
        balance: balance.to_string(),
    })))
}
