use elasticstat_core::cli::{Mode, run_mode};
use elasticstat_core::conf::Config;
use elasticstat_core::shutdown::Shutdown;
use elasticstat_core::source::{EventSource, MemoryFeed};

/// What one run left behind.
#[derive(Debug)]
pub struct RunOutput {
    pub emitted: u64,
    pub dropped: u64,
    pub stdout: String,
}

impl RunOutput {
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

/// Runs `mode` to completion over a finite in-memory feed.
pub fn run_over(mode: Mode, feed: MemoryFeed, config: &Config) -> RunOutput {
    let mut events = EventSource::new(feed, Shutdown::new());
    let mut stdout = Vec::new();

    let emitted = run_mode(mode, events.by_ref(), config, &mut stdout).expect("run failed");

    RunOutput {
        emitted,
        dropped: events.dropped(),
        stdout: String::from_utf8(stdout).expect("stdout is utf-8"),
    }
}
