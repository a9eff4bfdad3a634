use crate::filter::SlowSearch;
use crate::sink::{Sink, SinkError};
use chrono::NaiveDate;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_PREFIX_LEN: usize = 10;

/// A record that can be appended to a dated CSV file.
pub trait CsvRecord {
    /// ISO-8601 timestamp; its date selects the file.
    fn timestamp(&self) -> &str;

    fn csv_line(&self) -> String;
}

impl CsvRecord for SlowSearch {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn csv_line(&self) -> String {
        self.to_csv_line()
    }
}

/// Appends records to `<dir>/<prefix>-<YYYY-MM-DD>.csv`.
///
/// The date comes from each record's own timestamp, not the wall clock, so
/// replayed traffic lands in the file of the day it was captured. The file
/// is switched whenever that date changes.
pub struct DailyCsvWriter {
    dir: PathBuf,
    prefix: String,
    current: Option<(NaiveDate, BufWriter<File>)>,
}

impl DailyCsvWriter {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            current: None,
        }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}-{}.csv", self.prefix, date.format(DATE_FORMAT)))
    }

    pub fn current_date(&self) -> Option<NaiveDate> {
        self.current.as_ref().map(|(date, _)| *date)
    }

    fn writer_for(&mut self, date: NaiveDate) -> Result<&mut BufWriter<File>, SinkError> {
        let (_, writer) = match self.current.take() {
            Some((current, writer)) if current == date => self.current.insert((current, writer)),
            previous => {
                if let Some((_, mut previous)) = previous {
                    previous.flush().map_err(SinkError::io)?;
                }

                let path = self.path_for(date);
                let file = open_append(&self.dir, &path)?;
                tracing::info!(path = %path.display(), "opened daily csv");

                self.current.insert((date, BufWriter::new(file)))
            }
        };

        Ok(writer)
    }
}

fn open_append(dir: &Path, path: &Path) -> Result<File, SinkError> {
    fs::create_dir_all(dir).map_err(|e| SinkError::open(dir, e))?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SinkError::open(path, e))
}

/// Date part of an ISO-8601 timestamp.
pub(crate) fn record_date(timestamp: &str) -> Result<NaiveDate, SinkError> {
    timestamp
        .get(..DATE_PREFIX_LEN)
        .and_then(|date| NaiveDate::parse_from_str(date, DATE_FORMAT).ok())
        .ok_or_else(|| SinkError::InvalidTimestamp {
            timestamp: timestamp.to_string(),
        })
}

impl<R: CsvRecord> Sink<R> for DailyCsvWriter {
    fn emit(&mut self, record: &R) -> Result<(), SinkError> {
        let date = record_date(record.timestamp())?;
        let writer = self.writer_for(date)?;

        writeln!(writer, "{}", record.csv_line()).map_err(SinkError::io)?;
        writer.flush().map_err(SinkError::io)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        match self.current.as_mut() {
            Some((_, writer)) => writer.flush().map_err(SinkError::io),
            None => Ok(()),
        }
    }
}
