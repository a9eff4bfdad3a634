use crate::conf::Config;
use crate::shutdown::Shutdown;
use crate::source::{Feed, ReaderFeed, RedisPatternFeed, RedisQueueFeed};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// `--input` value that reads records from stdin.
pub const STDIN_INPUT: &str = "-";

/// Opens the feed a run reads from.
///
/// A replay file wins over Redis; otherwise a configured pattern selects the
/// pub/sub feed and the list is popped by default. Failing to connect here
/// is fatal.
pub fn open_feed(
    config: &Config,
    input: Option<&Path>,
    shutdown: &Shutdown,
) -> Result<Box<dyn Feed>> {
    if let Some(input) = input {
        if input == Path::new(STDIN_INPUT) {
            tracing::info!("replaying records from stdin");
            return Ok(Box::new(ReaderFeed::new(io::stdin().lock())));
        }

        let file = File::open(input)
            .with_context(|| format!("failed to open input {}", input.display()))?;
        tracing::info!(input = %input.display(), "replaying records from file");
        return Ok(Box::new(ReaderFeed::new(BufReader::new(file))));
    }

    let feed = &config.feed;
    let url = feed.redis_url();

    match &feed.pattern {
        Some(pattern) => {
            let feed =
                RedisPatternFeed::connect(&url, pattern, feed.idle_backoff(), shutdown.clone())
                    .context("failed to subscribe to the pattern feed")?;
            Ok(Box::new(feed))
        }
        None => open_queue(config, shutdown).map(|feed| Box::new(feed) as Box<dyn Feed>),
    }
}

/// The list feed, regardless of any configured pattern.
pub(crate) fn open_queue(config: &Config, shutdown: &Shutdown) -> Result<RedisQueueFeed> {
    let feed = &config.feed;

    RedisQueueFeed::connect(
        &feed.redis_url(),
        &feed.queue,
        feed.pop_timeout(),
        shutdown.clone(),
    )
    .context("failed to connect to the queue feed")
}
