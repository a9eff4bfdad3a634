use crate::source::FeedError;

/// A source of raw, still-encoded records.
pub trait Feed {
    /// Blocks until the next payload arrives.
    ///
    /// `Ok(None)` means the feed is finished: a finite input is exhausted or
    /// shutdown was requested while waiting.
    fn next_payload(&mut self) -> Result<Option<Vec<u8>>, FeedError>;
}

impl<F: Feed + ?Sized> Feed for Box<F> {
    fn next_payload(&mut self) -> Result<Option<Vec<u8>>, FeedError> {
        (**self).next_payload()
    }
}

impl<F: Feed + ?Sized> Feed for &mut F {
    fn next_payload(&mut self) -> Result<Option<Vec<u8>>, FeedError> {
        (**self).next_payload()
    }
}
