//! Logging setup.
//!
//! `RUST_LOG` wins when set; otherwise the level comes from the config file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use pwhash_core::{Config, LogDestination, LogLevel};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log_destination is FILE but log_file is not set")]
    MissingLogFile,

    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
    }
}

fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_filter(level).into())
        .from_env_lossy()
}

/// Install the global subscriber. Call once, before the server starts.
pub fn init(config: &Config) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(env_filter(config.log_level));

    match config.log_destination {
        LogDestination::Stdout => registry
            .with(fmt::layer().with_writer(std::io::stdout))
            .try_init()?,
        LogDestination::Stderr => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
        LogDestination::File => {
            let path = config
                .log_file
                .clone()
                .ok_or(LoggingError::MissingLogFile)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| LoggingError::OpenFile { path, source })?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()?
        }
    }

    Ok(())
}
