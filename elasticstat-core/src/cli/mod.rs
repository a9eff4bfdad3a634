mod feed;
mod run;


pub use feed::{STDIN_INPUT, open_feed};
pub use run::{drain, run, run_mode};

use crate::conf::Config;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the size and error count of every bulk request
    BulkSize,

    /// Print one line per failed bulk item
    BulkErrors,

    /// Append search response times to daily CSV files
    SlowSearch,

    /// Print who did what, and send per-action timings to statsd
    UserActivity,

    /// Report error responses, with parsed exception traces
    ErrorReport,

    /// Republish queued records on per-agent channels
    Relay,
}

/// Feed selection flags shared by every mode.
#[derive(Args, Debug, Clone, Default)]
pub struct FeedArgs {
    /// Redis host, overrides `feed.host`
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Subscribe to channels matching this glob instead of popping the queue
    #[arg(long, global = true)]
    pub pattern: Option<String>,

    /// Replay newline-delimited records from a file (`-` for stdin)
    #[arg(long, global = true, conflicts_with = "pattern")]
    pub input: Option<PathBuf>,
}

impl FeedArgs {
    /// Folds the flags over the file configuration. Flags win.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.feed.host = host.clone();
        }

        if let Some(pattern) = &self.pattern {
            config.feed.pattern = Some(pattern.clone());
        }
    }
}
