//! Scannable codes: rendering a QR code of a text and reading one back with a camera.
#[cfg(feature = "camera")]
pub mod camera;
pub mod scanner;

use std::{fmt::Debug, sync::Arc};

use iced::widget::qr_code;

#[cfg(feature = "camera")]
pub use camera::CameraScanner;
pub use scanner::{decode_region, Camera, NoCamera, ScanConfig, ScanError, Scanner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeError(pub String);

impl std::fmt::Display for CodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Failed to generate QR code: {}", self.0)
    }
}

pub trait CodeGenerator: Debug {
    fn encode(&self, text: &str) -> Result<qr_code::Data, CodeError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QrGenerator;

impl CodeGenerator for QrGenerator {
    fn encode(&self, text: &str) -> Result<qr_code::Data, CodeError> {
        qr_code::Data::new(text).map_err(|e| CodeError(e.to_string()))
    }
}

/// The camera scanner of the device, `NoCamera` if the platform has no camera backend.
#[cfg(feature = "camera")]
pub fn device_scanner() -> Arc<dyn Scanner + Send + Sync> {
    match CameraScanner::new() {
        Some(scanner) => Arc::new(scanner),
        None => {
            tracing::warn!("No camera backend available on this platform");
            Arc::new(NoCamera)
        }
    }
}

#[cfg(not(feature = "camera"))]
pub fn device_scanner() -> Arc<dyn Scanner + Send + Sync> {
    Arc::new(NoCamera)
}
