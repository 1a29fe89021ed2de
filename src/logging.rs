//! Structured logging and tracing for CEZ HDO
//!
//! Console and daily-rotated file output on top of `tracing-subscriber`, plus
//! small component loggers that stamp every line with the metering point and
//! signal they belong to.

use crate::config::LoggingConfig;
use crate::error::{HdoError, Result};
use std::path::Path;
use tracing::{Level, Subscriber, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod level;
mod state;
mod structured;

pub use level::{min_level, parse_log_level};
pub use structured::{LogContext, StructuredLogger, get_logger, get_logger_with_context};

use state::{INIT_ERROR, INIT_ONCE, LOG_GUARD};

/// Initialize logging system based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    INIT_ONCE.call_once(|| {
        let init_result = (|| -> Result<()> {
            let base_level = parse_log_level(&config.level)?;

            let console_level = config
                .console_level
                .as_ref()
                .and_then(|s| parse_log_level(s).ok())
                .unwrap_or(base_level);
            let file_level = config
                .file_level
                .as_ref()
                .and_then(|s| parse_log_level(s).ok())
                .unwrap_or(base_level);

            let filter = build_env_filter(min_level(console_level, file_level));

            if should_use_console_only() {
                init_console_only_logging(filter, config.json_format, console_level);
                return Ok(());
            }

            init_file_logging(config, filter, console_level, file_level)
        })();

        if let Err(e) = init_result {
            let _ = INIT_ERROR.set(e.to_string());
        }
    });

    if let Some(err) = INIT_ERROR.get() {
        return Err(HdoError::config(err.clone()));
    }
    Ok(())
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("cez_hdo={},reqwest=warn,hyper=warn", level).into())
}

fn should_use_console_only() -> bool {
    cfg!(test) || std::env::var_os("CEZ_HDO_DISABLE_FILE_LOG").is_some()
}

/// One formatted output, filtered to `level`
fn output_layer<S, W>(writer: W, json: bool, ansi: bool, level: Level) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_ansi(ansi);
    let filter = LevelFilter::from_level(level);
    if json {
        base.json().with_filter(filter).boxed()
    } else {
        base.with_filter(filter).boxed()
    }
}

fn init_console_only_logging(filter: EnvFilter, json_format: bool, console_level: Level) {
    // A test harness may already have installed a global subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(output_layer(std::io::stdout, json_format, true, console_level))
        .try_init();

    info!(?console_level, "Logging initialized, console only");
}

/// Directory the rolling files go to; a path with an extension names a file
fn log_dir(file: &str) -> &Path {
    let p = Path::new(file);
    match p.parent() {
        Some(parent) if p.extension().is_some() => parent,
        _ => p,
    }
}

fn init_file_logging(
    config: &LoggingConfig,
    filter: EnvFilter,
    console_level: Level,
    file_level: Level,
) -> Result<()> {
    let file_appender = rolling::Builder::new()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix("cez_hdo")
        .filename_suffix("log")
        .max_log_files(config.backup_count.max(1) as usize)
        .build(log_dir(&config.file))
        .map_err(|e| HdoError::io(format!("Failed to create log file appender: {}", e)))?;

    let (writer, guard) = non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    let console = config
        .console_output
        .then(|| output_layer(std::io::stdout, config.json_format, true, console_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(output_layer(writer, config.json_format, false, file_level))
        .with(console)
        .try_init()
        .map_err(|e| HdoError::config(e.to_string()))?;

    info!(
        ?console_level,
        ?file_level,
        file = %config.file,
        "Logging initialized"
    );
    Ok(())
}
