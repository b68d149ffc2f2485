//! libris CLI entrypoint

use std::fs::{self, File};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use libris::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing; warnings only on the terminal so the menu stays readable
    let file_layer = match open_log_file()? {
        Some(file) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    // Parse and execute CLI
    let cli = Cli::parse();
    cli.execute().await
}

/// Open the configured log file, truncating it like a fresh session log
fn open_log_file() -> Result<Option<File>> {
    let Ok(cfg) = libris::config::config() else {
        return Ok(None);
    };
    let Some(path) = &cfg.log_file else {
        return Ok(None);
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    Ok(Some(file))
}
