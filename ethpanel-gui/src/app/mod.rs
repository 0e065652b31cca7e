pub mod config;
pub mod error;
pub mod message;
pub mod session;
pub mod state;
pub mod view;

use std::sync::Arc;

use ethpanel::U256;
use iced::{Element, Task};
use tracing::{debug, error, info, warn};

pub use config::Config;
pub use error::Error;
pub use message::Message;

use crate::{
    code::{device_scanner, CodeGenerator, QrGenerator, ScanError, Scanner},
    provider::{EthClient, Ledger, ProviderError, WalletProvider},
};
use session::{Session, SessionStore};
use state::{Notice, PaymentForm, ReceivePanel, ScanState, ScannerModal};

/// The external capabilities the panel relies on.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub wallet: Option<Arc<dyn WalletProvider + Send + Sync>>,
    pub ledger: Option<Arc<dyn Ledger + Send + Sync>>,
    pub codes: Arc<dyn CodeGenerator + Send + Sync>,
    pub scanner: Arc<dyn Scanner + Send + Sync>,
}

impl Capabilities {
    /// Without a client, the wallet and the ledger are unavailable.
    pub fn new(client: Option<Arc<EthClient>>) -> Self {
        Self {
            wallet: client
                .clone()
                .map(|c| c as Arc<dyn WalletProvider + Send + Sync>),
            ledger: client.map(|c| c as Arc<dyn Ledger + Send + Sync>),
            codes: Arc::new(QrGenerator),
            scanner: device_scanner(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    LoggedOut,
    Dashboard,
}

/// What is displayed, derived from the app state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub panel: Panel,
    pub receive: bool,
    pub scanner: bool,
}

impl Visibility {
    pub fn logged_out(&self) -> bool {
        self.panel == Panel::LoggedOut
    }

    pub fn dashboard(&self) -> bool {
        self.panel == Panel::Dashboard
    }
}

pub struct App {
    config: Config,
    capabilities: Capabilities,
    session: Session,
    /// Balance of the session account, unknown until the first refresh.
    balance: Option<U256>,
    receive: Option<ReceivePanel>,
    payment: PaymentForm,
    scanner: ScannerModal,
    notice: Option<Notice>,

    connecting: bool,
    refreshing: bool,
    paying: bool,
}

impl App {
    pub fn new(
        config: Config,
        capabilities: Capabilities,
        store: Box<dyn SessionStore>,
    ) -> (Self, Task<Message>) {
        let session = Session::restore(store);
        let mut app = Self {
            config,
            capabilities,
            session,
            balance: None,
            receive: None,
            payment: PaymentForm::default(),
            scanner: ScannerModal::default(),
            notice: None,
            connecting: false,
            refreshing: false,
            paying: false,
        };
        if app.capabilities.wallet.is_none() {
            warn!("No wallet provider configured");
            app.notice = Some(Notice::error(
                "Wallet unavailable",
                ProviderError::Unavailable.into(),
            ));
        }
        let task = app.refresh_balance();
        (app, task)
    }

    pub fn title(&self) -> String {
        match self.session.account() {
            Some(account) => format!("Ethpanel - {}", account),
            None => "Ethpanel".to_string(),
        }
    }

    pub fn visibility(&self) -> Visibility {
        Visibility {
            panel: if self.session.is_connected() {
                Panel::Dashboard
            } else {
                Panel::LoggedOut
            },
            receive: self.receive.is_some(),
            scanner: self.scanner.is_open(),
        }
    }

    pub fn account(&self) -> Option<&str> {
        self.session.account()
    }

    pub fn balance(&self) -> Option<&U256> {
        self.balance.as_ref()
    }

    pub fn payment(&self) -> &PaymentForm {
        &self.payment
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn scan_state(&self) -> ScanState {
        self.scanner.state()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::View(view::Message::Connect) => return self.connect(),
            Message::View(view::Message::Disconnect) => self.disconnect(),
            Message::View(view::Message::RefreshBalance) => return self.refresh_balance(),
            Message::View(view::Message::ShowReceive) => self.show_receive(),
            Message::View(view::Message::CloseReceive) => {
                self.receive = None;
            }
            Message::View(view::Message::DestinationEdited(destination)) => {
                self.payment.destination = destination;
            }
            Message::View(view::Message::AmountEdited(amount)) => {
                self.payment.amount = amount;
            }
            Message::View(view::Message::SubmitPayment) => return self.submit_payment(),
            Message::View(view::Message::StartScan) => return self.start_scan(),
            Message::View(view::Message::StopScan) => return self.stop_scan(),
            Message::View(view::Message::DismissNotice) => {
                self.notice = None;
            }
            Message::Connected(res) => {
                self.connecting = false;
                match res.and_then(|accounts| {
                    accounts
                        .into_iter()
                        .next()
                        .ok_or_else(|| ProviderError::NoAccount.into())
                }) {
                    Ok(account) => {
                        info!("Connected to account {}", account);
                        self.session.set(account);
                        return self.on_session_changed();
                    }
                    Err(e) => {
                        warn!("Failed to connect: {}", e);
                        self.notice = Some(Notice::error("Connection failed", e));
                    }
                }
            }
            Message::Balance(account, res) => {
                if self.session.account() != Some(account.as_str()) {
                    debug!("Ignoring balance of previous account {}", account);
                    return Task::none();
                }
                self.refreshing = false;
                match res {
                    Ok(balance) => self.balance = Some(balance),
                    Err(e) => error!("Failed to refresh balance of {}: {}", account, e),
                }
            }
            Message::PaymentSent(res) => {
                self.paying = false;
                match res {
                    Ok(txid) => {
                        info!("Payment sent: {}", txid);
                        self.notice = Some(Notice::Info(format!(
                            "Payment sent\nTransaction hash: {}",
                            txid
                        )));
                        return self.refresh_balance();
                    }
                    Err(e) => {
                        error!("Payment failed: {}", e);
                        self.notice = Some(Notice::error("Payment failed", e));
                    }
                }
            }
            Message::ScanStarted(generation, res) => return self.scan_started(generation, res),
            Message::Scanned(generation, res) => return self.scanned(generation, res),
            Message::ScannerReleased(res) => {
                if let Err(e) = res {
                    error!("{}", e);
                }
            }
        }
        Task::none()
    }

    fn connect(&mut self) -> Task<Message> {
        if self.connecting {
            debug!("Connection already in progress");
            return Task::none();
        }
        let Some(wallet) = self.capabilities.wallet.clone() else {
            self.notice = Some(Notice::error(
                "Connection failed",
                ProviderError::Unavailable.into(),
            ));
            return Task::none();
        };
        self.connecting = true;
        Task::perform(
            async move { wallet.request_accounts().await.map_err(Error::from) },
            Message::Connected,
        )
    }

    fn disconnect(&mut self) {
        if let Some(account) = self.session.account() {
            info!("Disconnecting account {}", account);
        }
        self.session.clear();
        self.balance = None;
        self.receive = None;
        self.refreshing = false;
    }

    /// Called on every transition into the dashboard.
    fn on_session_changed(&mut self) -> Task<Message> {
        self.balance = None;
        self.receive = None;
        self.refreshing = false;
        self.refresh_balance()
    }

    fn refresh_balance(&mut self) -> Task<Message> {
        let Some(account) = self.session.account().map(str::to_string) else {
            return Task::none();
        };
        if self.refreshing {
            debug!("Balance refresh already in progress");
            return Task::none();
        }
        let Some(ledger) = self.capabilities.ledger.clone() else {
            warn!("Cannot refresh balance: no wallet provider");
            return Task::none();
        };
        self.refreshing = true;
        Task::perform(
            async move {
                let res = ledger.get_balance(&account).await.map_err(Error::from);
                (account, res)
            },
            |(account, res)| Message::Balance(account, res),
        )
    }

    fn show_receive(&mut self) {
        match self.session.account() {
            Some(account) => {
                self.receive = Some(ReceivePanel::new(
                    account.to_string(),
                    self.capabilities.codes.as_ref(),
                ));
            }
            None => {
                self.notice = Some(Notice::error(
                    "Receive",
                    Error::UserInput("Please connect a wallet first".to_string()),
                ));
            }
        }
    }

    fn submit_payment(&mut self) -> Task<Message> {
        if self.paying {
            debug!("Payment already in progress");
            return Task::none();
        }
        let (destination, value) = match self.payment.validate() {
            Ok(payment) => payment,
            Err(e) => {
                self.notice = Some(Notice::error("Payment failed", e));
                return Task::none();
            }
        };
        let Some(from) = self.session.account().map(str::to_string) else {
            self.notice = Some(Notice::error(
                "Payment failed",
                Error::UserInput("Please connect a wallet first".to_string()),
            ));
            return Task::none();
        };
        let Some(ledger) = self.capabilities.ledger.clone() else {
            self.notice = Some(Notice::error(
                "Payment failed",
                ProviderError::Unavailable.into(),
            ));
            return Task::none();
        };
        info!("Sending {} ETH from {} to {}", value, from, destination);
        self.paying = true;
        Task::perform(
            async move {
                ledger
                    .send_transaction(&from, &destination, value)
                    .await
                    .map_err(Error::from)
            },
            Message::PaymentSent,
        )
    }

    fn start_scan(&mut self) -> Task<Message> {
        let Some(generation) = self.scanner.open() else {
            debug!("Scanner already open");
            return Task::none();
        };
        Task::perform(
            state::acquire(self.capabilities.scanner.clone(), self.config.scanner),
            move |res| Message::ScanStarted(generation, res),
        )
    }

    fn stop_scan(&mut self) -> Task<Message> {
        match self.scanner.close() {
            ScanState::Scanning(_) => self.release_scanner(),
            // Released once the camera is acquired.
            ScanState::Acquiring(_) | ScanState::Idle => Task::none(),
        }
    }

    fn release_scanner(&self) -> Task<Message> {
        Task::perform(
            state::release(self.capabilities.scanner.clone()),
            Message::ScannerReleased,
        )
    }

    fn scan_started(&mut self, generation: u64, res: Result<(), Error>) -> Task<Message> {
        match res {
            Ok(()) => {
                if self.scanner.started(generation) {
                    Task::perform(
                        state::decode(self.capabilities.scanner.clone()),
                        move |res| Message::Scanned(generation, res),
                    )
                } else {
                    debug!("Scan {} cancelled during camera acquisition", generation);
                    self.release_scanner()
                }
            }
            Err(e) => {
                if self.scanner.is_current(generation) {
                    self.scanner.close();
                    self.notice = Some(Notice::error("Scanner error", e));
                }
                Task::none()
            }
        }
    }

    fn scanned(&mut self, generation: u64, res: Result<String, Error>) -> Task<Message> {
        if !self.scanner.is_current(generation) {
            debug!("Ignoring result of closed scan {}", generation);
            return Task::none();
        }
        self.scanner.close();
        match res {
            Ok(text) => {
                info!("Scanned payment address");
                self.payment.destination = text.trim().to_string();
            }
            Err(Error::Resource(ScanError::Stopped)) => {}
            Err(e) => {
                error!("{}", e);
                self.notice = Some(Notice::error("Scanner error", e));
            }
        }
        self.release_scanner()
    }

    pub fn view(&self) -> Element<Message> {
        let content = match self.session.account() {
            None => view::login(self.connecting),
            Some(account) => {
                let dashboard =
                    view::dashboard(account, self.balance.as_ref(), self.refreshing);
                match &self.receive {
                    Some(receive) => view::modal(
                        dashboard,
                        receive.view(&self.payment, self.paying, self.config.qr_cell_size),
                        Some(view::Message::CloseReceive),
                    ),
                    None => dashboard,
                }
            }
        };
        let content = if self.scanner.is_open() {
            view::modal(
                content,
                view::scanner::scanner(&self.config.scanner),
                Some(view::Message::StopScan),
            )
        } else {
            content
        };
        let content = match &self.notice {
            Some(notice) => view::modal(content, view::notice(notice), None),
            None => content,
        };
        content.map(Message::View)
    }
}
