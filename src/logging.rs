//! Tracing subscriber setup

use anyhow::{bail, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Keeps the non-blocking file writer alive; logs are flushed when dropped.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. When
/// `logging.directory` is set, events are also appended to a daily rolling
/// file named `library-catalog.log.<date>`.
pub fn init(config: &LoggingConfig) -> Result<LogGuard> {
    let level = parse_level(&config.level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_catalog={},tower_http=debug", level).into());

    let stdout_layer = match config.format.as_str() {
        "json" => fmt::layer().json().with_target(true).boxed(),
        "pretty" | "text" => fmt::layer().with_target(true).boxed(),
        other => bail!("Invalid log format: {}", other),
    };

    let (file_layer, file_guard) = match config.directory.as_deref() {
        Some(directory) => {
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Failed to create log directory {}", directory))?;
            let appender = tracing_appender::rolling::daily(directory, "library-catalog.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

fn parse_level(level: &str) -> Result<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" => Ok("warn"),
        "error" => Ok("error"),
        _ => bail!("Invalid log level: {}", level),
    }
}
