//! EIP-1193 methods and error codes used to talk to a wallet provider.

pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const ETH_SEND_TRANSACTION: &str = "eth_sendTransaction";

/// Returned by the wallet when the user refused the request.
pub const USER_REJECTED_REQUEST: i64 = 4001;
