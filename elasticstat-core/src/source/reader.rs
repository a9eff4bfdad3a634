use crate::source::{Feed, FeedError};
use std::io::BufRead;

/// Newline-delimited records from a file or stdin, for offline replay.
///
/// Blank lines are skipped. End of input ends the feed.
pub struct ReaderFeed<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> ReaderFeed<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead> Feed for ReaderFeed<R> {
    fn next_payload(&mut self) -> Result<Option<Vec<u8>>, FeedError> {
        loop {
            self.line.clear();

            if self.reader.read_line(&mut self.line).map_err(FeedError::io)? == 0 {
                return Ok(None);
            }

            let trimmed = self.line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.as_bytes().to_vec()));
            }
        }
    }
}
