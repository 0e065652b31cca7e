use std::convert::From;

use crate::{code::ScanError, provider::ProviderError};

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A capability is missing, the user must install or configure it.
    Setup(String),
    /// A required field is empty or malformed.
    UserInput(String),
    /// An external call was rejected or failed.
    Provider(ProviderError),
    /// The camera could not be used.
    Resource(ScanError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Setup(e) => write!(f, "{}", e),
            Self::UserInput(e) => write!(f, "{}", e),
            Self::Provider(e) => write!(f, "{}", e),
            Self::Resource(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ProviderError> for Error {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Unavailable => Error::Setup(error.to_string()),
            ProviderError::InvalidAddress(_) => Error::UserInput(error.to_string()),
            _ => Error::Provider(error),
        }
    }
}

impl From<ScanError> for Error {
    fn from(error: ScanError) -> Self {
        Error::Resource(error)
    }
}
