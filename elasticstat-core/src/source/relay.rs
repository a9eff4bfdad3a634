use crate::shutdown::Shutdown;
use crate::source::{Feed, FeedError};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_PUBLISH_PREFIX: &str = "/packetbeat/";

/// Destination of relayed payloads.
pub trait Publisher {
    fn publish(&mut self, channel: &str, payload: &[u8]) -> Result<(), FeedError>;
}

impl<P: Publisher + ?Sized> Publisher for &mut P {
    fn publish(&mut self, channel: &str, payload: &[u8]) -> Result<(), FeedError> {
        (**self).publish(channel, payload)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub relayed: u64,
    pub dropped: u64,
    pub failed: u64,
}

/// Only the routing key is read; the payload is forwarded untouched.
#[derive(Deserialize)]
struct Routing {
    #[serde(default)]
    agent: String,
}

/// Republishes every payload of `feed` on `<prefix><agent>`.
///
/// Runs until the feed ends or shutdown is requested. Payloads that are not
/// JSON are dropped; publish failures are counted and the next payload is
/// still relayed.
pub fn relay<F: Feed, P: Publisher>(
    mut feed: F,
    mut publisher: P,
    prefix: &str,
    retry_backoff: Duration,
    shutdown: &Shutdown,
) -> RelayStats {
    let mut stats = RelayStats::default();

    while !shutdown.is_requested() {
        let payload = match feed.next_payload() {
            Ok(Some(payload)) => payload,
            Ok(None) => break,
            Err(e) if e.is_retryable() => {
                tracing::warn!(error = %e, "feed error, retrying");
                shutdown.sleep(retry_backoff);
                continue;
            }
            Err(e) => {
                tracing::error!(error = %e, "feed failed");
                break;
            }
        };

        let routing = match serde_json::from_slice::<Routing>(&payload) {
            Ok(routing) => routing,
            Err(e) => {
                stats.dropped += 1;
                tracing::warn!(error = %FeedError::decode(e), "dropping feed message");
                continue;
            }
        };

        let channel = format!("{prefix}{}", routing.agent);
        match publisher.publish(&channel, &payload) {
            Ok(()) => stats.relayed += 1,
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(error = %e, channel = %channel, "publish failed");
            }
        }
    }

    tracing::info!(
        relayed = stats.relayed,
        dropped = stats.dropped,
        failed = stats.failed,
        "relay stopped"
    );
    stats
}
