pub mod client;

use std::fmt::Debug;

use async_trait::async_trait;
use ethers::providers::{ProviderError as EthersError, RpcError};
use ethpanel::{rpc::USER_REJECTED_REQUEST, U256};

pub use client::EthClient;

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// No wallet provider is configured.
    Unavailable,
    /// The user refused the request in the wallet.
    UserRejected(String),
    /// The provider answered with an error object.
    Rpc(i64, String),
    /// Something was wrong with the http communication.
    Http(Option<u16>, String),
    /// The provider answered with something we do not understand.
    InvalidResponse(String),
    /// The provider granted access to no account.
    NoAccount,
    /// Not an Ethereum address.
    InvalidAddress(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(
                f,
                "No wallet provider found, please install or configure an Ethereum wallet"
            ),
            Self::UserRejected(e) => write!(f, "Request rejected: {}", e),
            Self::Rpc(code, e) => write!(f, "[{}] {}", code, e),
            Self::Http(Some(code), e) => write!(f, "Http error: [{}] {}", code, e),
            Self::Http(None, e) => write!(f, "Http error: {}", e),
            Self::InvalidResponse(e) => write!(f, "Invalid provider response: {}", e),
            Self::NoAccount => write!(f, "No account found"),
            Self::InvalidAddress(a) => write!(f, "Invalid address: {}", a),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<EthersError> for ProviderError {
    fn from(e: EthersError) -> Self {
        if let Some(rpc) = e.as_error_response() {
            if rpc.code == USER_REJECTED_REQUEST {
                return Self::UserRejected(rpc.message.clone());
            }
            return Self::Rpc(rpc.code, rpc.message.clone());
        }
        if let Some(serde) = e.as_serde_error() {
            return Self::InvalidResponse(serde.to_string());
        }
        match e {
            EthersError::HTTPError(e) => Self::Http(e.status().map(|s| s.as_u16()), e.to_string()),
            EthersError::SerdeJson(e) => Self::InvalidResponse(e.to_string()),
            e => Self::Http(None, e.to_string()),
        }
    }
}

/// Grants access to the accounts of the user's wallet.
#[async_trait]
pub trait WalletProvider: Debug {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;
}

/// Reads balances and submits transfers on behalf of an account.
#[async_trait]
pub trait Ledger: Debug {
    async fn get_balance(&self, account: &str) -> Result<U256, ProviderError>;
    /// Returns the hash of the submitted transaction.
    async fn send_transaction(
        &self,
        from: &str,
        to: &str,
        value: U256,
    ) -> Result<String, ProviderError>;
}
