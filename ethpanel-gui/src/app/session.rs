//! The connected account, persisted in the data directory so it survives restarts.
use std::fmt::Debug;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dir::EthpanelDirectory;

pub const DEFAULT_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    ReadingFile(String),
    WritingFile(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::ReadingFile(e) => write!(f, "Error while reading session file: {}", e),
            Self::WritingFile(e) => write!(f, "Error while writing session file: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

/// Durable storage of the connected account.
pub trait SessionStore: Debug + Send + Sync {
    /// `None` if no account is stored.
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn save(&self, account: &str) -> Result<(), SessionError>;
    /// Removing an absent account is not an error.
    fn clear(&self) -> Result<(), SessionError>;
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct SessionFile {
    account: String,
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_directory(datadir: &EthpanelDirectory) -> Self {
        Self::new(datadir.file(DEFAULT_FILE_NAME))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::ReadingFile(e.to_string())),
        };
        serde_json::from_slice::<SessionFile>(&content)
            .map(|file| Some(file.account).filter(|a| !a.is_empty()))
            .map_err(|e| SessionError::ReadingFile(format!("Parsing session file: {}", e)))
    }

    fn save(&self, account: &str) -> Result<(), SessionError> {
        let content = serde_json::to_string_pretty(&SessionFile {
            account: account.to_string(),
        })
        .map_err(|e| SessionError::WritingFile(format!("Failed to serialize session: {}", e)))?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| SessionError::WritingFile(e.to_string()))?;

        file.write_all(content.as_bytes())
            .map_err(|e| SessionError::WritingFile(e.to_string()))
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(SessionError::WritingFile(e.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// The account currently connected, if any. Every change is written to the store.
#[derive(Debug)]
pub struct Session {
    account: Option<String>,
    store: Box<dyn SessionStore>,
}

impl Session {
    /// Reads the stored account. An unreadable store is treated as no account.
    pub fn restore(store: Box<dyn SessionStore>) -> Self {
        let account = match store.load() {
            Ok(account) => account,
            Err(e) => {
                warn!("Failed to restore session: {}", e);
                None
            }
        };
        if let Some(account) = &account {
            info!("Session restored for account {}", account);
        }
        Self { account, store }
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// The in-memory account is set even if it cannot be persisted.
    pub fn set(&mut self, account: String) {
        if let Err(e) = self.store.save(&account) {
            warn!("Failed to persist session: {}", e);
        }
        self.account = Some(account);
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear persisted session: {}", e);
        }
        self.account = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileSessionStore::in_directory(&EthpanelDirectory::new(tmp.path().into()));

        assert_eq!(store.load(), Ok(None));
        store.clear().unwrap();

        store.save("0xabc").unwrap();
        assert_eq!(store.load(), Ok(Some("0xabc".to_string())));
        store.save("0xdef").unwrap();
        assert_eq!(store.load(), Ok(Some("0xdef".to_string())));

        store.clear().unwrap();
        assert_eq!(store.load(), Ok(None));
        assert!(!tmp.path().join(DEFAULT_FILE_NAME).exists());

        std::fs::write(tmp.path().join(DEFAULT_FILE_NAME), "not json").unwrap();
        assert!(matches!(store.load(), Err(SessionError::ReadingFile(_))));
    }

    #[test]
    fn session_survives_restart() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(DEFAULT_FILE_NAME);

        let mut session = Session::restore(Box::new(FileSessionStore::new(path.clone())));
        assert!(!session.is_connected());
        session.set("0xabc".to_string());
        assert_eq!(session.account(), Some("0xabc"));

        let mut session = Session::restore(Box::new(FileSessionStore::new(path.clone())));
        assert_eq!(session.account(), Some("0xabc"));
        session.clear();
        assert!(!session.is_connected());

        let session = Session::restore(Box::new(FileSessionStore::new(path.clone())));
        assert_eq!(session.account(), None);

        // A corrupted file is ignored.
        std::fs::write(&path, "{").unwrap();
        let session = Session::restore(Box::new(FileSessionStore::new(path)));
        assert_eq!(session.account(), None);
    }
}
