use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Duration,
};

use async_trait::async_trait;
use iced::futures::channel::oneshot;
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType},
    NokhwaError,
};
use tracing::{debug, warn};

use super::scanner::{decode_region, luma, Camera, ScanConfig, ScanError, Scanner};

/// Scanner reading the frames of a device camera from a dedicated capture thread.
#[derive(Debug)]
pub struct CameraScanner {
    backend: ApiBackend,
    session: Mutex<Option<ScanSession>>,
}

#[derive(Debug)]
struct ScanSession {
    stop: Arc<AtomicBool>,
    decoded: Option<oneshot::Receiver<String>>,
    stopped: Option<oneshot::Receiver<Result<(), ScanError>>>,
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl CameraScanner {
    /// Returns `None` if the platform has no camera backend.
    pub fn new() -> Option<Self> {
        let backend = nokhwa::native_api_backend()?;
        #[cfg(target_os = "macos")]
        nokhwa::nokhwa_initialize(|granted| {
            if !granted {
                warn!("Camera access was not granted");
            }
        });
        Some(Self::with_backend(backend))
    }

    fn with_backend(backend: ApiBackend) -> Self {
        Self {
            backend,
            session: Mutex::new(None),
        }
    }

    fn session(&self) -> Result<MutexGuard<Option<ScanSession>>, ScanError> {
        self.session
            .lock()
            .map_err(|e| ScanError::CameraUnavailable(e.to_string()))
    }
}

#[async_trait]
impl Scanner for CameraScanner {
    async fn cameras(&self) -> Result<Vec<Camera>, ScanError> {
        let cameras = nokhwa::query(self.backend)
            .map_err(|e| ScanError::CameraUnavailable(e.to_string()))?;
        Ok(cameras
            .into_iter()
            .map(|info| Camera {
                id: info.index().as_string(),
                label: info.human_name(),
            })
            .collect())
    }

    async fn start(&self, camera: &Camera, config: ScanConfig) -> Result<(), ScanError> {
        if self.session()?.is_some() {
            return Err(ScanError::CameraUnavailable(
                "a scan is already running".to_string(),
            ));
        }

        let stop = Arc::new(AtomicBool::new(false));
        let (started_tx, started_rx) = oneshot::channel();
        let (decoded_tx, decoded_rx) = oneshot::channel();
        let (stopped_tx, stopped_rx) = oneshot::channel();
        let capture = Capture {
            index: camera_index(&camera.id),
            backend: self.backend,
            config,
            stop: stop.clone(),
        };
        std::thread::Builder::new()
            .name("scanner".to_string())
            .spawn(move || capture.run(started_tx, decoded_tx, stopped_tx))
            .map_err(|e| ScanError::CameraUnavailable(e.to_string()))?;

        started_rx.await.map_err(|_| {
            ScanError::CameraUnavailable("capture thread exited".to_string())
        })??;

        *self.session()? = Some(ScanSession {
            stop,
            decoded: Some(decoded_rx),
            stopped: Some(stopped_rx),
        });
        Ok(())
    }

    async fn decode(&self) -> Result<String, ScanError> {
        let decoded = self
            .session()?
            .as_mut()
            .and_then(|session| session.decoded.take());
        match decoded {
            Some(decoded) => decoded.await.map_err(|_| ScanError::Stopped),
            None => Err(ScanError::Stopped),
        }
    }

    async fn stop(&self) -> Result<(), ScanError> {
        let stopped = self.session()?.as_mut().and_then(|session| {
            session.stop.store(true, Ordering::Relaxed);
            session.stopped.take()
        });
        match stopped {
            Some(stopped) => stopped
                .await
                .map_err(|_| ScanError::Stop("capture thread exited".to_string()))?,
            None => Ok(()),
        }
    }

    fn clear(&self) {
        if let Ok(mut session) = self.session.lock() {
            *session = None;
        }
    }
}

fn camera_index(id: &str) -> CameraIndex {
    id.parse::<u32>()
        .map(CameraIndex::Index)
        .unwrap_or_else(|_| CameraIndex::String(id.to_string()))
}

/// Camera settings handed over to the capture thread, the device itself is opened there.
struct Capture {
    index: CameraIndex,
    backend: ApiBackend,
    config: ScanConfig,
    stop: Arc<AtomicBool>,
}

impl Capture {
    fn run(
        self,
        started: oneshot::Sender<Result<(), ScanError>>,
        decoded: oneshot::Sender<String>,
        stopped: oneshot::Sender<Result<(), ScanError>>,
    ) {
        let format =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut device =
            match nokhwa::Camera::with_backend(self.index.clone(), format, self.backend)
                .and_then(|mut device| device.open_stream().map(|_| device))
            {
                Ok(device) => device,
                Err(e) => {
                    let _ = started.send(Err(ScanError::CameraUnavailable(e.to_string())));
                    return;
                }
            };
        if started.send(Ok(())).is_err() {
            let _ = device.stop_stream();
            return;
        }
        debug!("Capture started on camera {}", self.index);

        let interval = Duration::from_millis(1000 / u64::from(self.config.fps.max(1)));
        let mut decoded = Some(decoded);
        while !self.stop.load(Ordering::Relaxed) {
            if decoded.is_some() {
                match read_frame(&mut device, self.config.qrbox) {
                    Ok(Some(text)) => {
                        if let Some(decoded) = decoded.take() {
                            let _ = decoded.send(text);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("Failed to read camera frame: {}", e),
                }
            }
            std::thread::sleep(interval);
        }
        // Dropping the sender resolves a pending decode with `Stopped`.
        drop(decoded);

        let res = device
            .stop_stream()
            .map_err(|e| ScanError::Stop(e.to_string()));
        debug!("Capture stopped on camera {}", self.index);
        let _ = stopped.send(res);
    }
}

fn read_frame(device: &mut nokhwa::Camera, qrbox: u32) -> Result<Option<String>, NokhwaError> {
    let image = device.frame()?.decode_image::<RgbFormat>()?;
    Ok(decode_region(image.width(), image.height(), qrbox, |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        luma(r, g, b)
    }))
}
