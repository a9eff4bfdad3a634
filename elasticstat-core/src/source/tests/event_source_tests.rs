use crate::http::tests::fixtures::http_event;
use crate::shutdown::Shutdown;
use crate::source::tests::{ScriptedFeed, connection_reset};
use crate::source::{EventSource, FeedError, MemoryFeed};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

fn payload(value: serde_json::Value) -> Vec<u8> {
    value.to_string().into_bytes()
}

fn record_json(agent: &str) -> serde_json::Value {
    json!({ "@timestamp": "2014-11-21T10:15:00.000Z", "agent": agent, "http": null })
}

#[test]
fn payloads_decode_into_events() {
    // Arrange
    let feed: MemoryFeed = [payload(record_json("a")), payload(record_json("b"))]
        .into_iter()
        .collect();

    // Act
    let agents: Vec<String> = EventSource::new(feed, Shutdown::new())
        .map(|event| event.agent_id().to_string())
        .collect();

    // Assert
    assert_eq!(agents, vec!["a", "b"]);
}

#[test]
fn undecodable_payloads_are_dropped() {
    // Arrange
    let feed: MemoryFeed = [
        b"not json".to_vec(),
        payload(record_json("a")),
        b"{\"@timestamp\": 12}".to_vec(),
        payload(record_json("b")),
    ]
    .into_iter()
    .collect();
    let mut source = EventSource::new(feed, Shutdown::new());

    // Act
    let agents: Vec<String> = source
        .by_ref()
        .map(|event| event.agent_id().to_string())
        .collect();

    // Assert
    assert_eq!(agents, vec!["a", "b"]);
    assert_eq!(source.dropped(), 2);
}

#[test]
fn full_http_records_survive_the_round_trip() {
    // Arrange
    let event = http_event("GET", "/logs/_search", "", 200, "{}");
    let mut feed = MemoryFeed::new();
    feed.push(
        json!({
            "@timestamp": event.timestamp(),
            "responsetime": event.response_time_ms(),
            "src_ip": event.source_ip(),
            "src_port": event.source_port(),
            "dst_ip": event.dest_ip(),
            "dst_port": event.dest_port(),
            "agent": event.agent_id(),
            "http": {
                "host": "search.local:9200",
                "content_length": 120,
                "request": { "uri": "/logs/_search", "method": "GET" },
                "response": { "code": 200 }
            },
            "request_raw": event.record().request_raw,
            "response_raw": event.record().response_raw,
        })
        .to_string(),
    );

    // Act
    let decoded: Vec<_> = EventSource::new(feed, Shutdown::new()).collect();

    // Assert
    assert_eq!(decoded, vec![event]);
}

#[test]
fn transport_errors_are_retried() {
    // Arrange
    let feed = ScriptedFeed::new(vec![
        Err(connection_reset()),
        Ok(Some(payload(record_json("a")))),
        Err(connection_reset()),
        Ok(Some(payload(record_json("b")))),
    ]);
    let source = EventSource::new(feed, Shutdown::new()).with_retry_backoff(Duration::ZERO);

    // Act
    let agents: Vec<String> = source.map(|event| event.agent_id().to_string()).collect();

    // Assert
    assert_eq!(agents, vec!["a", "b"]);
}

#[test]
fn io_errors_end_the_sequence() {
    // Arrange
    let feed = ScriptedFeed::new(vec![
        Ok(Some(payload(record_json("a")))),
        Err(FeedError::io(std::io::Error::other("disk gone"))),
        Ok(Some(payload(record_json("b")))),
    ]);
    let mut source = EventSource::new(feed, Shutdown::new());

    // Act
    let agents: Vec<String> = source
        .by_ref()
        .map(|event| event.agent_id().to_string())
        .collect();

    // Assert
    assert_eq!(agents, vec!["a"]);
    assert_eq!(source.into_feed().remaining(), 1);
}

#[test]
fn shutdown_stops_before_polling() {
    // Arrange
    let shutdown = Shutdown::new();
    let feed = ScriptedFeed::new(vec![Ok(Some(payload(record_json("a"))))]);
    let mut source = EventSource::new(feed, shutdown.clone());

    // Act
    shutdown.request();
    let next = source.next();

    // Assert
    assert!(next.is_none());
    assert_eq!(source.into_feed().remaining(), 1);
}
