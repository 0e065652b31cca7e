use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider, ProviderError as EthersError},
    types::{Address, TransactionRequest, TxHash},
    utils::to_checksum,
};
use ethpanel::{
    rpc::{ETH_REQUEST_ACCOUNTS, ETH_SEND_TRANSACTION},
    U256,
};
use tracing::{error, info};

use super::{Ledger, ProviderError, WalletProvider};

/// JSON-RPC client of a wallet provider reachable over http, for example a desktop wallet
/// exposing an EIP-1193 endpoint.
#[derive(Debug)]
pub struct EthClient {
    url: String,
    provider: Provider<Http>,
}

impl EthClient {
    pub fn new(url: &str) -> Result<Self, ProviderError> {
        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| ProviderError::Http(None, format!("Invalid url {}: {}", url, e)))?;
        Ok(Self {
            url: url.to_string(),
            provider,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn parse_address(address: &str) -> Result<Address, ProviderError> {
    address
        .trim()
        .parse::<Address>()
        .map_err(|_| ProviderError::InvalidAddress(address.to_string()))
}

fn failed(method: &str, e: EthersError) -> ProviderError {
    let e = ProviderError::from(e);
    error!("method {} failed: {}", method, e);
    e
}

#[async_trait]
impl WalletProvider for EthClient {
    /// Accounts are returned with their checksum encoding.
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        info!("{}", ETH_REQUEST_ACCOUNTS);
        let accounts: Vec<Address> = self
            .provider
            .request(ETH_REQUEST_ACCOUNTS, ())
            .await
            .map_err(|e| failed(ETH_REQUEST_ACCOUNTS, e))?;
        Ok(accounts.iter().map(|a| to_checksum(a, None)).collect())
    }
}

#[async_trait]
impl Ledger for EthClient {
    async fn get_balance(&self, account: &str) -> Result<U256, ProviderError> {
        let account = parse_address(account)?;
        info!("eth_getBalance");
        self.provider
            .get_balance(account, None)
            .await
            .map_err(|e| failed("eth_getBalance", e))
    }

    async fn send_transaction(
        &self,
        from: &str,
        to: &str,
        value: U256,
    ) -> Result<String, ProviderError> {
        let tx = TransactionRequest::new()
            .from(parse_address(from)?)
            .to(parse_address(to)?)
            .value(value);
        info!("{}", ETH_SEND_TRANSACTION);
        // Sent as is: the wallet fills in gas, nonce and chain and asks the user to sign.
        let hash: TxHash = self
            .provider
            .request(ETH_SEND_TRANSACTION, [tx])
            .await
            .map_err(|e| failed(ETH_SEND_TRANSACTION, e))?;
        Ok(format!("{:?}", hash))
    }
}
