use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Camera {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Frames decoded per second.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Side in pixels of the square region of the frame where codes are looked for.
    #[serde(default = "default_qrbox")]
    pub qrbox: u32,
}

fn default_fps() -> u32 {
    10
}

fn default_qrbox() -> u32 {
    250
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            qrbox: default_qrbox(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    NoCamera,
    CameraUnavailable(String),
    Decode(String),
    /// The scan was stopped before a code was decoded.
    Stopped,
    Stop(String),
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NoCamera => write!(f, "No camera detected"),
            Self::CameraUnavailable(e) => write!(
                f,
                "Unable to start the scanner, please make sure camera access is granted: {}",
                e
            ),
            Self::Decode(e) => write!(f, "Failed to read code: {}", e),
            Self::Stopped => write!(f, "Scanner stopped"),
            Self::Stop(e) => write!(f, "Failed to stop the scanner: {}", e),
        }
    }
}

/// A camera-based code reader.
///
/// A successful `start` must be followed by `stop` then `clear`, whatever the outcome of
/// `decode`. A failed `start` leaves the scanner stopped.
#[async_trait]
pub trait Scanner: Debug {
    async fn cameras(&self) -> Result<Vec<Camera>, ScanError>;
    async fn start(&self, camera: &Camera, config: ScanConfig) -> Result<(), ScanError>;
    /// Resolves with the first successfully decoded text, or `ScanError::Stopped`
    /// once the scanner is stopped.
    async fn decode(&self) -> Result<String, ScanError>;
    async fn stop(&self) -> Result<(), ScanError>;
    /// Releases the resources held for the last scan.
    fn clear(&self);
}

/// Scanner of a device without any camera backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCamera;

#[async_trait]
impl Scanner for NoCamera {
    async fn cameras(&self) -> Result<Vec<Camera>, ScanError> {
        Ok(Vec::new())
    }

    async fn start(&self, _camera: &Camera, _config: ScanConfig) -> Result<(), ScanError> {
        Err(ScanError::NoCamera)
    }

    async fn decode(&self) -> Result<String, ScanError> {
        Err(ScanError::Stopped)
    }

    async fn stop(&self) -> Result<(), ScanError> {
        Ok(())
    }

    fn clear(&self) {}
}

/// Looks for a QR code in the centered square of side `qrbox` of a frame, `luma` giving
/// the brightness of the frame pixel at (x, y). Returns the text of the first code read.
pub fn decode_region<F>(width: u32, height: u32, qrbox: u32, luma: F) -> Option<String>
where
    F: Fn(u32, u32) -> u8,
{
    let side = qrbox.min(width).min(height);
    if side == 0 {
        return None;
    }
    let left = (width - side) / 2;
    let top = (height - side) / 2;
    let mut image =
        rqrr::PreparedImage::prepare_from_greyscale(side as usize, side as usize, |x, y| {
            luma(left + x as u32, top + y as u32)
        });
    image
        .detect_grids()
        .into_iter()
        .find_map(|grid| grid.decode().ok().map(|(_, content)| content))
}

/// Brightness of an RGB pixel.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const URI: &str = "ethereum:0x52908400098527886E0F7030069857D2E4169EE7@1?value=2e18";

    /// A white frame with the QR code of `text` drawn at its center, 4 pixels per module.
    struct Frame {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    }

    impl Frame {
        fn blank(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![255; (width * height) as usize],
            }
        }

        fn with_code(width: u32, height: u32, text: &str) -> Self {
            let mut frame = Self::blank(width, height);
            let code = qrcode::QrCode::new(text.as_bytes()).unwrap();
            let modules = code.width() as u32;
            let colors = code.to_colors();
            let left = (width - modules * 4) / 2;
            let top = (height - modules * 4) / 2;
            for (i, color) in colors.iter().enumerate() {
                if *color != qrcode::Color::Dark {
                    continue;
                }
                let (mx, my) = (i as u32 % modules, i as u32 / modules);
                for dy in 0..4 {
                    for dx in 0..4 {
                        let (x, y) = (left + mx * 4 + dx, top + my * 4 + dy);
                        frame.pixels[(y * width + x) as usize] = 0;
                    }
                }
            }
            frame
        }

        fn decode(&self, qrbox: u32) -> Option<String> {
            decode_region(self.width, self.height, qrbox, |x, y| {
                self.pixels[(y * self.width + x) as usize]
            })
        }
    }

    #[test]
    fn decode_code_in_frame() {
        let frame = Frame::with_code(400, 300, URI);
        assert_eq!(frame.decode(250).as_deref(), Some(URI));
        // The region is bounded by the frame.
        assert_eq!(frame.decode(1000).as_deref(), Some(URI));
    }

    #[test]
    fn decode_nothing() {
        assert_eq!(Frame::blank(400, 300).decode(250), None);
        assert_eq!(Frame::blank(0, 0).decode(250), None);
        // The code does not fit in the region.
        assert_eq!(Frame::with_code(400, 300, URI).decode(60), None);
    }

    #[test]
    fn pixel_luma() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert!(luma(0, 255, 0) > luma(255, 0, 0));
    }

    #[tokio::test]
    async fn no_camera() {
        assert!(NoCamera.cameras().await.unwrap().is_empty());
        let camera = Camera {
            id: "0".to_string(),
            label: "Front".to_string(),
        };
        assert_eq!(
            NoCamera.start(&camera, ScanConfig::default()).await,
            Err(ScanError::NoCamera)
        );
        assert_eq!(NoCamera.decode().await, Err(ScanError::Stopped));
    }
}
