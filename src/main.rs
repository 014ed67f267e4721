mod actions;
mod cli;
mod config;
mod error;
mod models;
mod system;

use actions::Registry;
use cli::{Cli, Dispatcher, RunMode, TerminalPrompter};
use colored::*;
use config::{RuntimeConfig, Settings};
use error::Result;
use std::io;
use std::path::Path;
use system::SystemRunner;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_NAME: &str = "arch-maintenance.log";

fn main() -> Result<()> {
    let cli = Cli::from_args(std::env::args_os());
    let unattended = match cli.mode() {
        RunMode::Help => {
            println!("{}", cli::USAGE);
            return Ok(());
        },
        RunMode::All => true,
        RunMode::Interactive => false,
    };

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            println!("{}", format!("Error: {}", e).red());
            return Err(e);
        },
    };

    // Keep the guard alive so buffered log lines are flushed on exit.
    let _log_guard = init_logging(settings.log_dir.as_deref());
    info!("Starting arch-maintenance...");

    let registry = Registry::new();
    let config = match RuntimeConfig::detect(settings, &registry) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to initialize: {:?}", e);
            println!("{}", format!("Error: {}", e).red());
            return Err(e);
        },
    };

    if let Some(warning) = config.missing_tools_warning() {
        println!("{}", warning.yellow());
    }
    if !config.elevated {
        info!(
            "Not running as root; privileged steps go through {}",
            config.elevation_helper
        );
    }

    let mut dispatcher = Dispatcher::new(
        &registry,
        &config,
        SystemRunner,
        TerminalPrompter::new(),
        io::stdout(),
    );

    let result = if unattended {
        dispatcher.run_all().map(|_| ())
    } else {
        println!("{}", "Arch Linux maintenance".cyan().bold());
        dispatcher.run_interactive()
    };

    if let Err(e) = &result {
        error!("Stopped on a fatal error: {:?}", e);
        println!("{}", format!("Aborted: {}", e).red().bold());
    }
    result
}

/// Console logging filtered by `RUST_LOG`, plus a daily log file when `log_dir` is set.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(EnvFilter::from_default_env());

    let (file, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(LevelFilter::INFO);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    guard
}
