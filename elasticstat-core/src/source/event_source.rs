use crate::http::Event;
use crate::shutdown::Shutdown;
use crate::source::{Feed, FeedError};
use std::time::Duration;

pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Decoded events from a [`Feed`], in arrival order.
///
/// Undecodable payloads are logged and dropped. Retryable feed errors are
/// logged and the feed is polled again after `retry_backoff`; any other
/// feed error ends the sequence, as does a shutdown request.
pub struct EventSource<F> {
    feed: F,
    shutdown: Shutdown,
    retry_backoff: Duration,
    dropped: u64,
}

impl<F: Feed> EventSource<F> {
    pub fn new(feed: F, shutdown: Shutdown) -> Self {
        Self {
            feed,
            shutdown,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            dropped: 0,
        }
    }

    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Payloads dropped so far because they did not decode.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn into_feed(self) -> F {
        self.feed
    }
}

impl<F: Feed> Iterator for EventSource<F> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        while !self.shutdown.is_requested() {
            match self.feed.next_payload() {
                Ok(Some(payload)) => match Event::from_slice(&payload) {
                    Ok(event) => return Some(event),
                    Err(e) => {
                        self.dropped += 1;
                        tracing::warn!(
                            error = %FeedError::decode(e),
                            bytes = payload.len(),
                            "dropping feed message"
                        );
                    }
                },
                Ok(None) => return None,
                Err(e) if e.is_retryable() => {
                    tracing::warn!(
                        error = %e,
                        retry_in_ms = self.retry_backoff.as_millis() as u64,
                        "feed error, retrying"
                    );
                    self.shutdown.sleep(self.retry_backoff);
                }
                Err(e) => {
                    tracing::error!(error = %e, "feed failed");
                    return None;
                }
            }
        }

        None
    }
}
