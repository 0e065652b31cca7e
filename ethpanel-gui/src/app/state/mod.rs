mod receive;
mod scanner;

pub use receive::{PaymentForm, ReceivePanel};
pub use scanner::{acquire, decode, release, ScanState, ScannerModal};

use crate::app::error::Error;

/// A blocking notice, the user has to dismiss it.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error { title: &'static str, error: Error },
}

impl Notice {
    pub fn error(title: &'static str, error: Error) -> Self {
        Self::Error { title, error }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
