use serde::Deserialize;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_PREFIX: &str = "elasticstat.log";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Flattened JSON, one event per line.
    #[default]
    Json,
    /// Human-readable lines.
    Text,
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs the global subscriber.
///
/// Logs go to stderr, never stdout: stdout carries the derived records.
/// With `dir` set, logs go to a daily rolling file there instead; keep the
/// returned guard alive until exit or buffered lines are lost.
pub fn init_logging(format: LogFormat, level: &str, dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = env_filter(level);

    let appender = dir.and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .build(dir)
            .map_err(|e| eprintln!("cannot log to {}: {e}; using stderr", dir.display()))
            .ok()
    });

    let Some(appender) = appender else {
        let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
        match format {
            LogFormat::Json => builder.json().flatten_event(true).init(),
            LogFormat::Text => builder.init(),
        }
        return None;
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false);
    match format {
        LogFormat::Json => builder.json().flatten_event(true).init(),
        LogFormat::Text => builder.init(),
    }

    Some(guard)
}
