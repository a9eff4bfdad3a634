use crate::sink::{ErrorEvent, SinkError};
use std::io::Write;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Long-lived handle to an error-tracking backend.
///
/// Built once at startup and handed to [`ErrorReportSink`](crate::sink::ErrorReportSink).
pub trait Reporter {
    fn report(&mut self, event: &ErrorEvent) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, event: &ErrorEvent) -> Result<(), SinkError> {
        (**self).report(event)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

/// Reports each error as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, event: &ErrorEvent) -> Result<(), SinkError> {
        let extra = serde_json::to_string(&event.extra).map_err(SinkError::encode)?;

        tracing::error!(
            exception = %event.exception_type,
            description = %event.description,
            method = event.tags.get("method").map(String::as_str),
            status = event.tags.get("status").map(String::as_str),
            agent = event.tags.get("agent").map(String::as_str),
            timestamp = %event.timestamp,
            extra = %extra,
            "elasticsearch error"
        );
        Ok(())
    }
}

/// Writes each error as one JSON document per line.
pub struct JsonReporter<W> {
    out: W,
}

impl JsonReporter<RollingFileAppender> {
    /// Appends to `<dir>/<prefix>.<YYYY-MM-DD>`, rolling over daily.
    pub fn daily(dir: impl AsRef<Path>, prefix: &str) -> Result<Self, SinkError> {
        let dir = dir.as_ref();

        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(prefix)
            .build(dir)
            .map(Self::new)
            .map_err(|e| SinkError::open(dir, std::io::Error::other(e.to_string())))
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, event: &ErrorEvent) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(event).map_err(SinkError::encode)?;
        line.push(b'\n');
        self.out.write_all(&line).map_err(SinkError::io)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.out.flush().map_err(SinkError::io)
    }
}
