//! Ethers-backed Chain Reader
//!
//! `Provider<Http>` + 런타임 로드된 ABI 로 `ChainReader` 구현.
//!
//! 컨트랙트 호출 흐름:
//!
//! ```text
//! Function::encode_input ─▶ eth_call ─▶ Function::decode_output ─▶ Vec<Token> ─▶ RawBook / RawLoan
//! ```
//!
//! abigen 대신 런타임 ABI를 쓰는 이유: 배포된 컨트랙트 버전에 따라
//! `getBookInfo` / `loanInfos` 의 반환 필드 수가 다름.

use anyhow::Context;
use async_trait::async_trait;
use ethers::abi::Token;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, TransactionRequest as EthTransactionRequest, U256};

use crate::error::ChainError;
use crate::services::book_projector::RawBook;
use crate::services::chain::{ChainReader, CollectionInfo, ContractCall, EncodedCall};
use crate::services::contracts::{ContractHandles, ContractKind, Deployment, LibraryContracts};
use crate::services::loan_projector::RawLoan;
use crate::types::EthAddress;

/// JSON-RPC 노드 + 컨트랙트 핸들
pub struct EthersChain {
    provider: Provider<Http>,
    contracts: ContractHandles,
}

impl EthersChain {
    /// Provider 생성 (연결은 첫 호출 시점)
    pub fn connect(rpc_url: &str, contracts: ContractHandles) -> anyhow::Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .with_context(|| format!("invalid ETH_RPC_URL: {}", rpc_url))?;

        Ok(Self { provider, contracts })
    }

    fn loaded(&self) -> Result<&LibraryContracts, ChainError> {
        self.contracts.loaded().ok_or(ChainError::ContractsNotLoaded)
    }

    /// view 함수 호출 → 디코딩된 토큰
    async fn call_view(
        &self,
        kind: ContractKind,
        method: &str,
        args: &[Token],
    ) -> Result<Vec<Token>, ChainError> {
        let (to, abi) = self.loaded()?.handle(kind);
        let function = abi.function(method)?;
        let data = function.encode_input(args)?;

        let tx: TypedTransaction = EthTransactionRequest::new().to(to).data(data).into();
        let output = self.provider.call(&tx, None).await?;

        let tokens = function.decode_output(output.as_ref())?;
        Ok(flatten_struct(tokens))
    }

    async fn call_single(
        &self,
        kind: ContractKind,
        method: &'static str,
        args: &[Token],
    ) -> Result<Token, ChainError> {
        let mut reader = TokenReader::new(method, self.call_view(kind, method, args).await?);
        reader.next(method)
    }
}

#[async_trait]
impl ChainReader for EthersChain {
    async fn is_connected(&self) -> bool {
        match self.provider.get_net_version().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("node probe failed: {}", e);
                false
            }
        }
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        let id = self.provider.get_chainid().await?;
        to_u64(id, "chainId")
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        Ok(self.provider.get_block_number().await?.as_u64())
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        let price = self.provider.get_gas_price().await?;
        if price > U256::from(u128::MAX) {
            return Err(ChainError::Decode(format!("gas price {} overflows u128", price)));
        }
        Ok(price.as_u128())
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError> {
        let count = self.provider.get_transaction_count(address, None).await?;
        to_u64(count, "nonce")
    }

    async fn balance(&self, address: Address) -> Result<U256, ChainError> {
        Ok(self.provider.get_balance(address, None).await?)
    }

    fn deployment(&self) -> Option<&Deployment> {
        self.contracts.loaded().map(|c| &c.deployment)
    }

    async fn collection_info(&self) -> Result<CollectionInfo, ChainError> {
        let name = self.call_single(ContractKind::BookNft, "name", &[]).await?;
        let symbol = self.call_single(ContractKind::BookNft, "symbol", &[]).await?;
        let address = self.loaded()?.deployment.book_nft;

        Ok(CollectionInfo {
            name: expect_string(name, "name")?,
            symbol: expect_string(symbol, "symbol")?,
            address,
        })
    }

    async fn next_book_id(&self) -> Result<u64, ChainError> {
        let token = self.call_single(ContractKind::BookNft, "nextBookId", &[]).await?;
        to_u64(expect_uint(token, "nextBookId")?, "nextBookId")
    }

    async fn book_info(&self, book_id: u64) -> Result<RawBook, ChainError> {
        let tokens = self
            .call_view(ContractKind::BookNft, "getBookInfo", &[Token::Uint(book_id.into())])
            .await?;
        decode_book(tokens)
    }

    async fn owner_of(&self, book_id: u64) -> Result<EthAddress, ChainError> {
        let token = self
            .call_single(ContractKind::BookNft, "ownerOf", &[Token::Uint(book_id.into())])
            .await?;
        token
            .into_address()
            .map(EthAddress::from)
            .ok_or_else(|| ChainError::Decode("ownerOf: expected address".to_string()))
    }

    async fn loan_info(&self, book_id: u64) -> Result<RawLoan, ChainError> {
        let tokens = self
            .call_view(ContractKind::LibraryCore, "loanInfos", &[Token::Uint(book_id.into())])
            .await?;
        decode_loan(tokens)
    }

    async fn nft_balance(&self, owner: Address) -> Result<U256, ChainError> {
        let token = self
            .call_single(ContractKind::BookNft, "balanceOf", &[Token::Address(owner)])
            .await?;
        expect_uint(token, "balanceOf")
    }

    fn encode_call(&self, call: &ContractCall) -> Result<EncodedCall, ChainError> {
        let (to, abi) = self.loaded()?.handle(call.target());
        let function = abi.function(call.method())?;
        let data = function.encode_input(&call_tokens(call))?;

        Ok(EncodedCall {
            to,
            data: data.into(),
        })
    }
}

fn call_tokens(call: &ContractCall) -> Vec<Token> {
    match call {
        ContractCall::MintBook {
            name,
            description,
            status,
        } => vec![
            Token::String(name.clone()),
            Token::String(description.clone()),
            Token::Uint(U256::from(*status)),
        ],
        ContractCall::BorrowBook { book_id } => vec![Token::Uint(U256::from(*book_id))],
        ContractCall::ReturnBook {
            book_id,
            return_status,
        } => vec![
            Token::Uint(U256::from(*book_id)),
            Token::Uint(U256::from(*return_status)),
        ],
    }
}

/// struct 하나를 반환하는 함수는 tuple 한 개로 디코딩됨 → 펼침
fn flatten_struct(tokens: Vec<Token>) -> Vec<Token> {
    match <[Token; 1]>::try_from(tokens) {
        Ok([Token::Tuple(fields)]) => fields,
        Ok([single]) => vec![single],
        Err(tokens) => tokens,
    }
}

/// `getBookInfo` 토큰 → RawBook
///
/// 필수 5개 필드 + 선택 이미지 해시 2개
pub fn decode_book(tokens: Vec<Token>) -> Result<RawBook, ChainError> {
    let mut r = TokenReader::new("getBookInfo", tokens);

    Ok(RawBook {
        title: r.string("name")?,
        description: r.string("description")?,
        status: r.u64("status")?,
        condition: r.u64("condition")?,
        created_at: r.u64("createdAt")?,
        image_before_hash: r.optional_string("imageBeforeHash")?.unwrap_or_default(),
        image_after_hash: r.optional_string("imageAfterHash")?.unwrap_or_default(),
    })
}

/// `loanInfos` 토큰 → RawLoan
///
/// 필수 5개 필드 + 선택 statusAtLoan / statusAtReturn. 나머지(penalty 등)는 무시
pub fn decode_loan(tokens: Vec<Token>) -> Result<RawLoan, ChainError> {
    let mut r = TokenReader::new("loanInfos", tokens);

    Ok(RawLoan {
        borrower: r.address("borrower")?,
        borrowed_at: r.u64("borrowedAt")?,
        due_date: r.u64("dueDate")?,
        deposit: r.uint("deposit")?,
        is_returned: r.bool("isReturned")?,
        status_at_loan: r.optional_u64("statusAtLoan")?.unwrap_or(0),
        status_at_return: r.optional_u64("statusAtReturn")?.unwrap_or(0),
    })
}

/// 순차 토큰 디코더
struct TokenReader {
    method: &'static str,
    tokens: std::vec::IntoIter<Token>,
}

impl TokenReader {
    fn new(method: &'static str, tokens: Vec<Token>) -> Self {
        Self {
            method,
            tokens: tokens.into_iter(),
        }
    }

    fn next(&mut self, field: &str) -> Result<Token, ChainError> {
        self.tokens
            .next()
            .ok_or_else(|| ChainError::Decode(format!("{}: missing field `{}`", self.method, field)))
    }

    fn err(&self, field: &str, expected: &str) -> ChainError {
        ChainError::Decode(format!("{}: field `{}` is not {}", self.method, field, expected))
    }

    fn string(&mut self, field: &str) -> Result<String, ChainError> {
        self.next(field)?
            .into_string()
            .ok_or_else(|| self.err(field, "a string"))
    }

    fn uint(&mut self, field: &str) -> Result<U256, ChainError> {
        self.next(field)?
            .into_uint()
            .ok_or_else(|| self.err(field, "an integer"))
    }

    fn u64(&mut self, field: &str) -> Result<u64, ChainError> {
        let value = self.uint(field)?;
        to_u64(value, field)
    }

    fn bool(&mut self, field: &str) -> Result<bool, ChainError> {
        self.next(field)?
            .into_bool()
            .ok_or_else(|| self.err(field, "a bool"))
    }

    fn address(&mut self, field: &str) -> Result<EthAddress, ChainError> {
        self.next(field)?
            .into_address()
            .map(EthAddress::from)
            .ok_or_else(|| self.err(field, "an address"))
    }

    fn optional_string(&mut self, field: &str) -> Result<Option<String>, ChainError> {
        match self.tokens.next() {
            None => Ok(None),
            Some(token) => token
                .into_string()
                .map(Some)
                .ok_or_else(|| self.err(field, "a string")),
        }
    }

    fn optional_u64(&mut self, field: &str) -> Result<Option<u64>, ChainError> {
        match self.tokens.next() {
            None => Ok(None),
            Some(token) => {
                let value = token.into_uint().ok_or_else(|| self.err(field, "an integer"))?;
                to_u64(value, field).map(Some)
            }
        }
    }
}

fn to_u64(value: U256, field: &str) -> Result<u64, ChainError> {
    if value > U256::from(u64::MAX) {
        return Err(ChainError::Decode(format!("`{}` value {} overflows u64", field, value)));
    }
    Ok(value.as_u64())
}

fn expect_string(token: Token, field: &str) -> Result<String, ChainError> {
    token
        .into_string()
        .ok_or_else(|| ChainError::Decode(format!("`{}` is not a string", field)))
}

fn expect_uint(token: Token, field: &str) -> Result<U256, ChainError> {
    token
        .into_uint()
        .ok_or_else(|| ChainError::Decode(format!("`{}` is not an integer", field)))
}
