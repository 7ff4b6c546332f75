use anyhow::Context;
use clap::Parser;
use duet::{
    config::{default_config_path, parse_command_line, Config},
    constants::{LOOPBACK_REPLY_SOURCE, LOOPBACK_USER_SOURCE},
    logging::init_logging,
    ui::run_ui,
    App, LoopbackBackend, ProcessBridge,
};
use log::info;
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Parser)]
#[command(name = "duet", version, about = "Terminal chat front-end for a backend process")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend command line, e.g. "python3 backend.py"
    #[arg(long, conflicts_with = "loopback")]
    backend: Option<String>,

    /// Use the built-in loopback backend even if one is configured
    #[arg(long)]
    loopback: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let mut config = Config::load_or_create(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if let Some(backend) = cli.backend.as_deref() {
        config.backend_command = parse_command_line(backend)?;
        config.validate()?;
    }
    if cli.loopback {
        config.backend_command = None;
    }

    let _logger = init_logging(&config.log_level)?;
    info!("starting with config {}", config_path.display());

    let (handle, events) = match &config.backend_command {
        Some(command) => ProcessBridge::spawn(command)?,
        None => {
            let reply_source = config
                .system_sources
                .first()
                .map(String::as_str)
                .unwrap_or(LOOPBACK_REPLY_SOURCE);
            info!("no backend configured, using loopback");
            LoopbackBackend::new(LOOPBACK_USER_SOURCE, reply_source).spawn()
        }
    };

    let mut app = App::new(&config, handle);
    if config.request_initial_data {
        app.request_initial_data();
    }

    run_ui(&mut app, events, Duration::from_millis(config.tick_rate_ms)).await?;
    info!("shutting down");
    Ok(())
}
