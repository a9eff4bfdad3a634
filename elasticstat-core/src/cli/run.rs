use crate::cli::Mode;
use crate::cli::feed::{open_feed, open_queue};
use crate::conf::{Config, ErrorReporterKind};
use crate::es_error::TraceParser;
use crate::filter::{
    BulkErrorTracker, BulkSizeTracker, ErrorTracker, FilterExt, SlowSearchTracker,
    UserActivityTracker,
};
use crate::http::Event;
use crate::shutdown::Shutdown;
use crate::sink::{
    ConsoleSink, DailyCsvWriter, ErrorReportSink, JsonReporter, LogReporter, Reporter, Sink,
    StatsdSink,
};
use crate::source::{EventSource, Feed, RedisPublisher, relay};
use anyhow::{Context, Result, bail};
use std::io::{self, Write};
use std::path::Path;

/// Runs one mode until the feed ends or shutdown is requested.
pub fn run(mode: Mode, config: &Config, input: Option<&Path>, shutdown: &Shutdown) -> Result<()> {
    tracing::info!(?mode, "starting");

    if mode == Mode::Relay {
        return run_relay(config, input, shutdown);
    }

    let feed = open_feed(config, input, shutdown)?;
    let mut events =
        EventSource::new(feed, shutdown.clone()).with_retry_backoff(config.feed.retry_backoff());

    let emitted = run_mode(mode, events.by_ref(), config, io::stdout())?;

    tracing::info!(
        ?mode,
        emitted,
        dropped = events.dropped(),
        "finished"
    );
    Ok(())
}

fn run_relay(config: &Config, input: Option<&Path>, shutdown: &Shutdown) -> Result<()> {
    let feed: Box<dyn Feed> = match input {
        Some(_) => open_feed(config, input, shutdown)?,
        None => Box::new(open_queue(config, shutdown)?),
    };

    let url = config.feed.redis_url();
    let publisher =
        RedisPublisher::connect(&url).context("failed to connect the relay publisher")?;

    let stats = relay(
        feed,
        publisher,
        &config.relay.publish_prefix,
        config.feed.retry_backoff(),
        shutdown,
    );

    tracing::info!(
        relayed = stats.relayed,
        dropped = stats.dropped,
        failed = stats.failed,
        "relay finished"
    );
    Ok(())
}

/// Drives `events` through the filter and sinks of `mode`.
///
/// Console output goes to `out`. Returns how many records the sinks
/// accepted.
pub fn run_mode<I, W>(mode: Mode, events: I, config: &Config, out: W) -> Result<u64>
where
    I: Iterator<Item = Event>,
    W: Write,
{
    let filters = &config.filters;
    let sinks = &config.sinks;
    let mut console = ConsoleSink::new(out, sinks.console_format);

    let emitted = match mode {
        Mode::BulkSize => {
            let filter = BulkSizeTracker::filter().with_endpoint(&filters.bulk_endpoint);
            drain(events.records(filter), &mut console)
        }

        Mode::BulkErrors => {
            let filter = BulkErrorTracker::filter().with_endpoint(&filters.bulk_endpoint);
            drain(events.records(filter), &mut console)
        }

        Mode::SlowSearch => {
            let filter =
                SlowSearchTracker::new(&filters.search_endpoint, filters.min_search_time_ms);
            let csv = DailyCsvWriter::new(&sinks.slow_search.dir, &sinks.slow_search.prefix);
            let echo = sinks.slow_search.echo.then_some(&mut console);
            drain(events.records(filter), &mut (csv, echo))
        }

        Mode::UserActivity => {
            let statsd = sinks
                .statsd
                .as_ref()
                .map(|statsd| StatsdSink::new(&statsd.address, statsd.protocol));
            drain(events.records(UserActivityTracker), &mut (&mut console, statsd))
        }

        Mode::ErrorReport => {
            let reporter = error_reporter(config)?;
            let parser = TraceParser::new(&filters.boring_exceptions);
            let mut sink =
                ErrorReportSink::new(reporter, parser).with_bulk_endpoint(&filters.bulk_endpoint);
            drain(events.records(ErrorTracker::new(filters.min_error_code)), &mut sink)
        }

        Mode::Relay => bail!("relay republishes raw records and has no event pipeline"),
    };

    Ok(emitted)
}

fn error_reporter(config: &Config) -> Result<Box<dyn Reporter>> {
    let errors = &config.sinks.errors;

    match errors.reporter {
        ErrorReporterKind::Log => Ok(Box::new(LogReporter)),
        ErrorReporterKind::Json => {
            let reporter = JsonReporter::daily(&errors.dir, &errors.prefix).with_context(|| {
                format!("failed to open error reports in {}", errors.dir.display())
            })?;
            Ok(Box::new(reporter))
        }
    }
}

/// Hands every record to `sink`, then flushes it.
///
/// A sink failure drops that one record; the stream goes on.
pub fn drain<R, I, S>(records: I, sink: &mut S) -> u64
where
    I: IntoIterator<Item = R>,
    S: Sink<R> + ?Sized,
{
    let mut emitted = 0;

    for record in records {
        match sink.emit(&record) {
            Ok(()) => emitted += 1,
            Err(e) => tracing::warn!(error = %e, "sink rejected record"),
        }
    }

    if let Err(e) = sink.flush() {
        tracing::warn!(error = %e, "sink flush failed");
    }

    emitted
}
