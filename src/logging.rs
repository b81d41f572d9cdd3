//! Logging setup
//!
//! Installs a `tracing` subscriber writing to stdout through a non-blocking
//! writer. Verbosity is controlled with `RUST_LOG` (defaults to `info`).

use std::io;

use clap::ValueEnum;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard flushes the non-blocking writer.
pub struct LoggingGuard {
    _stdout_guard: WorkerGuard,
}

/// Initialize the global subscriber
pub fn init_logging(format: LogFormat) -> Result<LoggingGuard, TryInitError> {
    let (non_blocking_stdout, stdout_guard) = tracing_appender::non_blocking(io::stdout());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(non_blocking_stdout))
            .try_init()?,
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking_stdout),
            )
            .try_init()?,
    }

    Ok(LoggingGuard {
        _stdout_guard: stdout_guard,
    })
}
