use crate::source::{Feed, FeedError, Publisher};
use glob::Pattern;
use std::collections::VecDeque;

/// In-process feed.
///
/// Without a subscription it behaves like a list: every pushed payload is
/// delivered in order. With one, only payloads published on a channel
/// matching the glob are kept, like a Redis pattern subscription.
#[derive(Debug, Clone, Default)]
pub struct MemoryFeed {
    subscription: Option<Pattern>,
    messages: VecDeque<(String, Vec<u8>)>,
}

impl MemoryFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribed(pattern: &str) -> Result<Self, glob::PatternError> {
        Ok(Self {
            subscription: Some(Pattern::new(pattern)?),
            messages: VecDeque::new(),
        })
    }

    /// Queues a payload with no channel. Always delivered.
    pub fn push(&mut self, payload: impl Into<Vec<u8>>) {
        self.messages.push_back((String::new(), payload.into()));
    }

    /// Returns whether the channel matched the subscription.
    pub fn publish_on(&mut self, channel: &str, payload: impl Into<Vec<u8>>) -> bool {
        if !self.matches(channel) {
            return false;
        }

        self.messages.push_back((channel.to_string(), payload.into()));
        true
    }

    pub fn matches(&self, channel: &str) -> bool {
        self.subscription
            .as_ref()
            .is_none_or(|pattern| pattern.matches(channel))
    }

    /// Channels of the queued payloads, oldest first.
    pub fn channels(&self) -> Vec<&str> {
        self.messages
            .iter()
            .map(|(channel, _)| channel.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Feed for MemoryFeed {
    fn next_payload(&mut self) -> Result<Option<Vec<u8>>, FeedError> {
        Ok(self.messages.pop_front().map(|(_, payload)| payload))
    }
}

impl Publisher for MemoryFeed {
    fn publish(&mut self, channel: &str, payload: &[u8]) -> Result<(), FeedError> {
        self.publish_on(channel, payload);
        Ok(())
    }
}

impl<P: Into<Vec<u8>>> FromIterator<P> for MemoryFeed {
    fn from_iter<I: IntoIterator<Item = P>>(payloads: I) -> Self {
        let mut feed = Self::new();
        for payload in payloads {
            feed.push(payload);
        }
        feed
    }
}
