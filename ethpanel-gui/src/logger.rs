use crate::dir::EthpanelDirectory;
use std::{error::Error, fs::File, str::FromStr, sync::Arc};
use tracing_subscriber::{
    filter::{self, LevelFilter},
    fmt::writer::BoxMakeWriter,
    prelude::*,
};

pub const GUI_LOG_FILE_NAME: &str = "ethpanel-gui.log";

/// Targets of dependencies too verbose to be of any help.
const SILENCED_TARGETS: &[&str] = &[
    "iced_wgpu",
    "iced_winit",
    "iced_graphics",
    "iced_runtime",
    "iced_core",
    "wgpu_core",
    "wgpu_hal",
    "naga",
    "winit",
    "mio",
    "cosmic_text",
    "polling",
    "calloop",
    "async_io",
    "rustls",
    "hyper",
    "hyper_util",
    "reqwest",
    "ethers_providers",
    "nokhwa",
    "tokio",
];

pub fn setup_logger(
    log_level: filter::LevelFilter,
    datadir: &EthpanelDirectory,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(datadir.file(GUI_LOG_FILE_NAME))?;
    let writer = BoxMakeWriter::new(Arc::new(file));

    let file_log = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(false);

    let stdout_log = tracing_subscriber::fmt::layer().pretty().with_file(false);

    tracing_subscriber::registry()
        .with(
            stdout_log
                .and_then(file_log)
                .with_filter(log_level)
                // Rejects spans and events of both layers whose targets
                // start with one of the silenced prefixes.
                .with_filter(filter::filter_fn(|metadata| {
                    !SILENCED_TARGETS
                        .iter()
                        .any(|target| metadata.target().starts_with(target))
                })),
        )
        .try_init()?;

    Ok(())
}

/// Parse LOG_LEVEL environment variable.
pub fn parse_log_level() -> Result<Option<LevelFilter>, Box<dyn Error>> {
    if let Ok(l) = std::env::var("LOG_LEVEL") {
        Ok(Some(LevelFilter::from_str(&l)?))
    } else {
        Ok(None)
    }
}
