use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use ethpanel::U256;

use crate::{
    app::session::{SessionError, SessionStore},
    code::{Camera, ScanConfig, ScanError, Scanner},
    provider::{Ledger, ProviderError, WalletProvider},
};

/// In-memory session store, clones share the stored account.
#[derive(Debug, Default, Clone)]
pub struct MockStore {
    account: Arc<Mutex<Option<String>>>,
}

impl MockStore {
    pub fn with_account(account: &str) -> Self {
        Self {
            account: Arc::new(Mutex::new(Some(account.to_string()))),
        }
    }

    pub fn account(&self) -> Option<String> {
        self.account.lock().unwrap().clone()
    }
}

impl SessionStore for MockStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.account())
    }

    fn save(&self, account: &str) -> Result<(), SessionError> {
        *self.account.lock().unwrap() = Some(account.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.account.lock().unwrap() = None;
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockWallet {
    accounts: Result<Vec<String>, ProviderError>,
    calls: AtomicUsize,
}

impl MockWallet {
    pub fn new(accounts: Result<Vec<String>, ProviderError>) -> Self {
        Self {
            accounts,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.accounts.clone()
    }
}

#[derive(Debug)]
pub struct MockLedger {
    balance: Result<U256, ProviderError>,
    txid: Result<String, ProviderError>,
    balance_calls: AtomicUsize,
    sent: Mutex<Vec<(String, String, U256)>>,
}

impl MockLedger {
    pub fn new(balance: Result<U256, ProviderError>, txid: Result<String, ProviderError>) -> Self {
        Self {
            balance,
            txid,
            balance_calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    /// Every transaction submitted, even the failed ones.
    pub fn sent(&self) -> Vec<(String, String, U256)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn get_balance(&self, _account: &str) -> Result<U256, ProviderError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balance.clone()
    }

    async fn send_transaction(
        &self,
        from: &str,
        to: &str,
        value: U256,
    ) -> Result<String, ProviderError> {
        self.sent
            .lock()
            .unwrap()
            .push((from.to_string(), to.to_string(), value));
        self.txid.clone()
    }
}

#[derive(Debug)]
pub struct MockScanner {
    cameras: Vec<Camera>,
    decoded: Result<String, ScanError>,
    start_error: Mutex<Option<ScanError>>,
    started: Mutex<bool>,
    start_calls: AtomicUsize,
    decode_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    clear_calls: AtomicUsize,
}

impl MockScanner {
    pub fn new(cameras: Vec<Camera>, decoded: Result<String, ScanError>) -> Self {
        Self {
            cameras,
            decoded,
            start_error: Mutex::new(None),
            started: Mutex::new(false),
            start_calls: AtomicUsize::new(0),
            decode_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            clear_calls: AtomicUsize::new(0),
        }
    }

    /// Makes every following `start` fail with `error`.
    pub fn fail_start(&self, error: ScanError) {
        *self.start_error.lock().unwrap() = Some(error);
    }

    pub fn is_started(&self) -> bool {
        *self.started.lock().unwrap()
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn decode_calls(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Scanner for MockScanner {
    async fn cameras(&self) -> Result<Vec<Camera>, ScanError> {
        Ok(self.cameras.clone())
    }

    async fn start(&self, _camera: &Camera, _config: ScanConfig) -> Result<(), ScanError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.start_error.lock().unwrap().clone() {
            return Err(e);
        }
        *self.started.lock().unwrap() = true;
        Ok(())
    }

    async fn decode(&self) -> Result<String, ScanError> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        if !self.is_started() {
            return Err(ScanError::Stopped);
        }
        self.decoded.clone()
    }

    async fn stop(&self) -> Result<(), ScanError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        *self.started.lock().unwrap() = false;
        Ok(())
    }

    fn clear(&self) {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
    }
}
