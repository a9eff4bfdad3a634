mod daily_csv_tests;
mod traits_tests;

use crate::sink::{ErrorEvent, Reporter, SinkError};

/// Keeps every reported event in memory.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    pub(crate) events: Vec<ErrorEvent>,
    pub(crate) flushes: usize,
}

impl Reporter for RecordingReporter {
    fn report(&mut self, event: &ErrorEvent) -> Result<(), SinkError> {
        self.events.push(event.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.flushes += 1;
        Ok(())
    }
}
