#![windows_subsystem = "windows"]

use std::{error::Error, io::Write, sync::Arc};

use iced::Size;
use tracing::{error, info};

use ethpanel_gui::{
    app::{
        config,
        session::FileSessionStore,
        App, Capabilities, Config,
    },
    args::{parse_args, Arg},
    dir::EthpanelDirectory,
    logger::{parse_log_level, setup_logger},
    provider::EthClient,
    VERSION,
};

fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args(std::env::args().collect(), VERSION)?;

    let mut datadir = None;
    let mut provider_url = None;
    for arg in args {
        match arg {
            Arg::DatadirPath(path) => datadir = Some(path),
            Arg::Provider(url) => provider_url = Some(url),
        }
    }
    let datadir = match datadir {
        Some(datadir) => datadir,
        None => EthpanelDirectory::new_default()?,
    };
    if !datadir.exists() {
        datadir.init()?;
    }

    let config_path = datadir.file(config::DEFAULT_FILE_NAME);
    let written = !config_path.exists();
    let mut config = Config::from_file_or_default(&config_path)?;
    if written {
        config.to_file(&config_path)?;
    }
    if provider_url.is_some() {
        config.provider_url = provider_url;
    }

    let log_level = match parse_log_level()? {
        Some(level) => level,
        None => config.log_level()?,
    };
    setup_logger(log_level, &datadir)?;
    setup_panic_hook();

    info!("Starting ethpanel {} in {}", VERSION, datadir.path().display());
    if written {
        info!("Default configuration written to {}", config_path.display());
    }

    let client = match config.provider_url.as_deref() {
        Some(url) => {
            info!("Using wallet provider at {}", url);
            Some(Arc::new(EthClient::new(url)?))
        }
        None => None,
    };
    let capabilities = Capabilities::new(client);
    let store = FileSessionStore::in_directory(&datadir);

    if let Err(e) = iced::application(App::title, App::update, App::view)
        .window_size(Size {
            width: 900.0,
            height: 650.0,
        })
        .run_with(move || App::new(config, capabilities, Box::new(store)))
    {
        log::error!("{}", e);
        Err(format!("Failed to launch UI: {}", e).into())
    } else {
        Ok(())
    }
}

// A panic in any thread should stop the main thread, and print the panic.
fn setup_panic_hook() {
    std::panic::set_hook(Box::new(move |panic_info| {
        let file = panic_info
            .location()
            .map(|l| l.file())
            .unwrap_or_else(|| "'unknown'");
        let line = panic_info
            .location()
            .map(|l| l.line().to_string())
            .unwrap_or_else(|| "'unknown'".to_string());

        let bt = backtrace::Backtrace::new();
        let info = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned());
        error!(
            "panic occurred at line {} of file {}: {:?}\n{:?}",
            line, file, info, bt
        );

        std::io::stdout().flush().expect("Flushing stdout");
        std::process::exit(1);
    }));
}
