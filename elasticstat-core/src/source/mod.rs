//! Event sources.
//!
//! A [`Feed`] hands out raw payloads: a Redis list popped with `BLPOP`, a
//! Redis pattern subscription, an in-memory queue or a newline-delimited
//! file. [`EventSource`] decodes those payloads into [`Event`]s, dropping
//! what does not decode and riding out transport errors.
//!
//! [`Event`]: crate::http::Event

mod error;
mod event_source;
mod feed;
mod memory;
mod reader;
mod redis_feed;
mod relay;

#[cfg(test)]
mod tests;

pub use error::FeedError;
pub use event_source::{DEFAULT_RETRY_BACKOFF, EventSource};
pub use feed::Feed;
pub use memory::MemoryFeed;
pub use reader::ReaderFeed;
pub use redis_feed::{
    DEFAULT_IDLE_BACKOFF, DEFAULT_POP_TIMEOUT, RedisPatternFeed, RedisPublisher, RedisQueueFeed,
};
pub use relay::{DEFAULT_PUBLISH_PREFIX, Publisher, RelayStats, relay};
