//! padbank - gamepad polling host
//!
//! Polls the four controller slots at a fixed frame rate, logs button edges
//! and plays the configured rumble when A goes down.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use padbank::config::AppConfig;
use padbank::host;
use padbank::input::gamepad::{backend, print_gamepad_diagnostics};
use padbank::{BackendKind, ControllerBank};

/// padbank - poll up to four gamepads and report button edges
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Print one snapshot of every slot and exit
    #[arg(long)]
    diagnostics: bool,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Override the backend from the configuration file
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("Starting padbank...");
    info!("Configuration file: {}", args.config);

    let mut config = AppConfig::load_or_default(&args.config).await?;
    if let Some(kind) = args.backend {
        config.backend = kind;
    }

    let platform = backend::open(config.backend).context("Failed to open gamepad backend")?;
    let mut bank = ControllerBank::with_deadzones(
        platform.clone(),
        platform,
        config.all_deadzones(),
    );

    if args.diagnostics {
        print_gamepad_diagnostics(&mut bank);
        return Ok(());
    }

    let frames = host::run_loop(&mut bank, &config, args.frames, shutdown_signal()).await;
    debug!("Polled {} frames", frames);

    // Leave no motor spinning on exit
    host::stop_all_rumble(&mut bank);

    info!("padbank shutdown complete");
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install CTRL+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
