use crate::filter::{Filter, UserActivity, UserActivityTracker, derive_action};
use crate::http::tests::fixtures::{
    TIMESTAMP, bulk_body, event_from, http_event, http_record, non_http_event, request_raw,
    response_raw,
};
use pretty_assertions::assert_eq;

#[test]
fn action_prefers_marked_last_slug() {
    assert_eq!(derive_action(&["logs", "_search"]), "search");
    assert_eq!(derive_action(&["_cat", "_indices"]), "indices");
    assert_eq!(derive_action(&["_bulk"]), "bulk");
}

#[test]
fn action_falls_back_to_marked_first_slug() {
    assert_eq!(derive_action(&["_cat", "indices"]), "cat");
    assert_eq!(derive_action(&["_nodes", "stats", "jvm"]), "nodes");
}

#[test]
fn action_is_unknown_without_marker() {
    assert_eq!(derive_action(&["logs", "event", "1"]), "?");
    assert_eq!(derive_action(&[]), "?");
}

#[test]
fn bare_marker_is_an_empty_action() {
    assert_eq!(derive_action(&["_"]), "");
    assert_eq!(derive_action(&["logs", "_"]), "");
    assert_eq!(derive_action(&["_", "stats"]), "");
}

#[test]
fn activity_record_describes_the_request() {
    // Arrange
    let event = http_event("GET", "/logs/_search?q=user:bob", "", 200, "{}");

    // Act
    let records = UserActivityTracker.derive(&event).unwrap();

    // Assert
    assert_eq!(
        records,
        vec![UserActivity {
            timestamp: TIMESTAMP.to_string(),
            agent: "es-node-1".to_string(),
            response_time_ms: 42,
            source: "10.0.0.7:53122".to_string(),
            dest: "10.0.0.1:9200".to_string(),
            user_agent: "curl/8.4.0".to_string(),
            method: "GET".to_string(),
            action: "search".to_string(),
            uri: "/logs/_search?q=user:bob".to_string(),
            bulk_count: 0,
            request_len: event.record().request_raw.len(),
            response_len: event.record().response_raw.len(),
        }]
    );
}

#[test]
fn bulk_activity_counts_operations() {
    // Arrange
    let event = http_event("POST", "/_bulk", &bulk_body(4), 200, "{\"items\":[]}");

    // Act
    let records = UserActivityTracker.derive(&event).unwrap();

    // Assert
    assert_eq!(records[0].action, "bulk");
    assert_eq!(records[0].bulk_count, 4);
}

#[test]
fn missing_user_agent_is_empty() {
    // Arrange
    let request = request_raw("GET", "/", &[("Host", "search.local:9200")], "");
    let event = event_from(http_record("GET", "/", &request, 200, &response_raw(200, "{}")));

    // Act
    let records = UserActivityTracker.derive(&event).unwrap();

    // Assert
    assert_eq!(records[0].user_agent, "");
    assert_eq!(records[0].action, "?");
}

#[test]
fn non_http_events_yield_no_activity() {
    assert!(UserActivityTracker.derive(&non_http_event()).unwrap().is_empty());
}

#[test]
fn activity_is_deterministic() {
    // Arrange
    let event = http_event("PUT", "/logs/_mapping", "{}", 200, "{}");

    // Act
    let first = UserActivityTracker.derive(&event).unwrap();
    let second = UserActivityTracker.derive(&event).unwrap();

    // Assert
    assert_eq!(first, second);
}
