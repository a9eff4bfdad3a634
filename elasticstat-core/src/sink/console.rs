use crate::sink::{Sink, SinkError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::{self, Stdout, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleFormat {
    /// The record's space-separated line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Writes one line per record.
pub struct ConsoleSink<W> {
    out: W,
    format: ConsoleFormat,
}

impl ConsoleSink<Stdout> {
    pub fn stdout(format: ConsoleFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, format: ConsoleFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write, R: Display + Serialize> Sink<R> for ConsoleSink<W> {
    fn emit(&mut self, record: &R) -> Result<(), SinkError> {
        match self.format {
            ConsoleFormat::Text => writeln!(self.out, "{record}").map_err(SinkError::io),
            ConsoleFormat::Json => {
                serde_json::to_writer(&mut self.out, record).map_err(SinkError::encode)?;
                self.out.write_all(b"\n").map_err(SinkError::io)
            }
        }
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.out.flush().map_err(SinkError::io)
    }
}
