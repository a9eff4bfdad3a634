use crate::es_error::DEFAULT_BORING_EXCEPTIONS;
use crate::filter::{
    DEFAULT_BULK_ENDPOINT, DEFAULT_MIN_ERROR_CODE, DEFAULT_SEARCH_ENDPOINT,
};
use crate::logging::LogFormat;
use crate::sink::{ConsoleFormat, StatsdProtocol};
use crate::source::DEFAULT_PUBLISH_PREFIX;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level `elasticstat.hcl`. Every block and attribute is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub filters: FiltersConfig,
    pub sinks: SinksConfig,
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
}

//-----------------------------------------------------------------------------
// Feed
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,

    /// List popped with `BLPOP` when no pattern is set.
    pub queue: String,

    /// Glob of channels to subscribe to; switches the feed to pub/sub.
    pub pattern: Option<String>,

    pub pop_timeout_secs: u64,
    pub idle_backoff_ms: u64,
    pub retry_backoff_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            queue: "packetbeat".to_string(),
            pattern: None,
            pop_timeout_secs: 1,
            idle_backoff_ms: 25,
            retry_backoff_ms: 1000,
        }
    }
}

impl FeedConfig {
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }

    pub fn pop_timeout(&self) -> Duration {
        Duration::from_secs(self.pop_timeout_secs)
    }

    pub fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

//-----------------------------------------------------------------------------
// Filters
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    pub bulk_endpoint: String,
    pub search_endpoint: String,
    pub min_search_time_ms: u64,
    pub min_error_code: u16,
    pub boring_exceptions: Vec<String>,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            bulk_endpoint: DEFAULT_BULK_ENDPOINT.to_string(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            min_search_time_ms: 0,
            min_error_code: DEFAULT_MIN_ERROR_CODE,
            boring_exceptions: DEFAULT_BORING_EXCEPTIONS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

//-----------------------------------------------------------------------------
// Sinks
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SinksConfig {
    pub console_format: ConsoleFormat,
    pub slow_search: SlowSearchCsvConfig,
    /// Timings are only sent when this block is present.
    pub statsd: Option<StatsdConfig>,
    pub errors: ErrorSinkConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SlowSearchCsvConfig {
    pub dir: PathBuf,
    pub prefix: String,
    /// Also print each record on stdout.
    pub echo: bool,
}

impl Default for SlowSearchCsvConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            prefix: "slow-search".to_string(),
            echo: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsdConfig {
    pub address: String,
    pub protocol: StatsdProtocol,
}

impl Default for StatsdConfig {
    fn default() -> Self {
        Self {
            address: "localhost:8125".to_string(),
            protocol: StatsdProtocol::Tcp,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorReporterKind {
    /// Structured log events.
    #[default]
    Log,
    /// JSON lines in a daily file under `dir`.
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ErrorSinkConfig {
    pub reporter: ErrorReporterKind,
    pub dir: PathBuf,
    pub prefix: String,
}

impl Default for ErrorSinkConfig {
    fn default() -> Self {
        Self {
            reporter: ErrorReporterKind::Log,
            dir: PathBuf::from("errors"),
            prefix: "elasticsearch-errors".to_string(),
        }
    }
}

//-----------------------------------------------------------------------------
// Relay / logging
//-----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub publish_prefix: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            publish_prefix: DEFAULT_PUBLISH_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            dir: None,
        }
    }
}
