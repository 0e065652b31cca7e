use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    app::error::Error,
    code::{ScanConfig, ScanError, Scanner},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    /// Waiting for the camera of the scan of the given generation.
    Acquiring(u64),
    Scanning(u64),
}

/// Lifecycle of the scanner overlay.
///
/// Every opening starts a new generation so that the late results of a scan the user
/// already closed are recognised and discarded.
#[derive(Debug)]
pub struct ScannerModal {
    state: ScanState,
    generation: u64,
}

impl Default for ScannerModal {
    fn default() -> Self {
        Self {
            state: ScanState::Idle,
            generation: 0,
        }
    }
}

impl ScannerModal {
    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != ScanState::Idle
    }

    /// Returns the generation of the new scan, `None` if a scan is already in progress.
    pub fn open(&mut self) -> Option<u64> {
        if self.is_open() {
            return None;
        }
        self.generation += 1;
        self.state = ScanState::Acquiring(self.generation);
        Some(self.generation)
    }

    /// Returns false if the scan was closed while the camera was being acquired.
    pub fn started(&mut self, generation: u64) -> bool {
        if self.state == ScanState::Acquiring(generation) {
            self.state = ScanState::Scanning(generation);
            true
        } else {
            false
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        match self.state {
            ScanState::Acquiring(g) | ScanState::Scanning(g) => g == generation,
            ScanState::Idle => false,
        }
    }

    /// Returns the state before closing.
    pub fn close(&mut self) -> ScanState {
        std::mem::replace(&mut self.state, ScanState::Idle)
    }
}

/// Starts decoding with the first camera of the device.
pub async fn acquire(scanner: Arc<dyn Scanner + Send + Sync>, config: ScanConfig) -> Result<(), Error> {
    let cameras = scanner.cameras().await.map_err(|e| {
        error!("Failed to list cameras: {}", e);
        Error::from(e)
    })?;
    let camera = cameras.into_iter().next().ok_or_else(|| {
        warn!("No camera detected");
        Error::Resource(ScanError::NoCamera)
    })?;
    info!("Starting scanner with camera '{}' ({})", camera.label, camera.id);
    scanner.start(&camera, config).await.map_err(|e| {
        error!("Unable to start the scanner: {}", e);
        Error::from(e)
    })
}

pub async fn decode(scanner: Arc<dyn Scanner + Send + Sync>) -> Result<String, Error> {
    scanner.decode().await.map_err(Error::from)
}

/// Stops the scanner and clears it, even if stopping failed.
pub async fn release(scanner: Arc<dyn Scanner + Send + Sync>) -> Result<(), Error> {
    let res = scanner.stop().await;
    scanner.clear();
    res.map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_generations() {
        let mut modal = ScannerModal::default();
        assert!(!modal.is_open());

        assert_eq!(modal.open(), Some(1));
        assert!(modal.is_open());
        assert_eq!(modal.open(), None);
        assert!(modal.is_current(1));
        assert!(!modal.started(2));
        assert!(modal.started(1));
        assert_eq!(modal.state(), ScanState::Scanning(1));

        assert_eq!(modal.close(), ScanState::Scanning(1));
        assert!(!modal.is_current(1));

        // Closed while acquiring: the late camera cannot start the scan.
        assert_eq!(modal.open(), Some(2));
        assert_eq!(modal.close(), ScanState::Acquiring(2));
        assert!(!modal.started(2));
        assert_eq!(modal.state(), ScanState::Idle);
    }
}
