use ethpanel::U256;

use crate::app::{error::Error, view};

#[derive(Debug, Clone)]
pub enum Message {
    View(view::Message),
    Connected(Result<Vec<String>, Error>),
    /// Balance of the given account.
    Balance(String, Result<U256, Error>),
    PaymentSent(Result<String, Error>),
    /// The scan of the given generation acquired its camera.
    ScanStarted(u64, Result<(), Error>),
    Scanned(u64, Result<String, Error>),
    ScannerReleased(Result<(), Error>),
}
