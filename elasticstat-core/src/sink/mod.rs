//! Where derived records go: stdout, daily CSV files, statsd and an error
//! reporter.

mod console;
mod daily_csv;
mod error;
mod error_report;
mod reporter;
mod statsd;
mod traits;

#[cfg(test)]
mod tests;

pub use console::{ConsoleFormat, ConsoleSink};
pub use daily_csv::{CsvRecord, DailyCsvWriter};
pub use error::SinkError;
pub use error_report::{ErrorEvent, ErrorReportSink, UNPARSED_EXCEPTION};
pub use reporter::{JsonReporter, LogReporter, Reporter};
pub use statsd::{StatsdProtocol, StatsdSink, Timed, timing_line};
pub use traits::Sink;
