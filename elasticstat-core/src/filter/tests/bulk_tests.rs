use crate::filter::tests::fixtures::{bulk_response, mapper_error};
use crate::filter::{
    BulkErrorTracker, BulkItemError, BulkOnly, BulkSize, BulkSizeTracker, Filter, FilterError,
};
use crate::http::HttpParseError;
use crate::http::tests::fixtures::{TIMESTAMP, bulk_body, http_event, non_http_event};
use pretty_assertions::assert_eq;
use serde_json::json;

//-----------------------------------------------------------------------------
// BulkSizeTracker
//-----------------------------------------------------------------------------

#[test]
fn bulk_size_counts_operations_and_errors() {
    // Arrange
    let response = bulk_response(&[
        ("index", "logs", None),
        ("index", "logs", Some(mapper_error())),
        ("index", "logs", None),
    ]);
    let event = http_event("POST", "/_bulk", &bulk_body(3), 200, &response);
    let mut filter = BulkSizeTracker::filter();

    // Act
    let records = filter.derive(&event).unwrap();

    // Assert
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.bulk_size, 3);
    assert_eq!(record.bulk_errors, 1);
    assert_eq!(record.index.as_deref(), Some("logs"));
    assert_eq!(record.code, 200);
    assert_eq!(record.method, "POST");
    assert_eq!(record.response_time_ms, 42);
    assert_eq!(record.request_len, event.record().request_raw.len());
    assert_eq!(record.response_len, event.record().response_raw.len());
}

#[test]
fn bulk_size_line_matches_console_layout() {
    // Arrange
    let response = bulk_response(&[("create", "metrics", None)]);
    let event = http_event("POST", "/_bulk?refresh=true", &bulk_body(1), 200, &response);

    // Act
    let record = BulkSizeTracker::filter().derive(&event).unwrap().remove(0);

    // Assert
    assert_eq!(
        record.to_string(),
        format!(
            "{TIMESTAMP} es-node-1 10.0.0.7 200 POST 42 {} {} metrics 1 0 /_bulk?refresh=true",
            record.request_len, record.response_len
        )
    );
}

#[test]
fn empty_items_have_no_size_and_no_index() {
    // Arrange
    let event = http_event("POST", "/_bulk", &bulk_body(2), 200, &bulk_response(&[]));

    // Act
    let records = BulkSizeTracker::filter().derive(&event).unwrap();

    // Assert
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].bulk_size, 0);
    assert_eq!(records[0].bulk_errors, 0);
    assert_eq!(records[0].index, None);
    assert!(records[0].to_string().contains(" - 0 0 "));
}

#[test]
fn non_bulk_paths_are_skipped() {
    // Arrange
    let response = bulk_response(&[("index", "logs", None)]);
    let events = [
        http_event("POST", "/logs/_bulk", &bulk_body(1), 200, &response),
        http_event("GET", "/_search", "", 200, "{}"),
        non_http_event(),
    ];
    let mut filter = BulkSizeTracker::filter();

    // Act
    let records: Vec<BulkSize> = events
        .iter()
        .flat_map(|event| filter.derive(event).unwrap())
        .collect();

    // Assert
    assert!(records.is_empty());
}

#[test]
fn custom_endpoint_is_honoured() {
    // Arrange
    let response = bulk_response(&[("index", "logs", None)]);
    let event = http_event("POST", "/logs/_bulk", &bulk_body(1), 200, &response);
    let mut filter = BulkOnly::new(BulkSizeTracker).with_endpoint("/logs/_bulk");

    // Act
    let records = filter.derive(&event).unwrap();

    // Assert
    assert_eq!(filter.endpoint(), "/logs/_bulk");
    assert_eq!(records.len(), 1);
}

#[test]
fn response_without_items_is_an_error() {
    // Arrange
    let event = http_event("POST", "/_bulk", &bulk_body(1), 200, "{\"took\":1}");

    // Act
    let result = BulkSizeTracker::filter().derive(&event);

    // Assert
    assert_eq!(result, Err(FilterError::MissingField { field: "items" }));
}

#[test]
fn non_json_response_is_an_error() {
    // Arrange
    let event = http_event("POST", "/_bulk", &bulk_body(1), 503, "<html>unavailable</html>");

    // Act
    let result = BulkSizeTracker::filter().derive(&event);

    // Assert
    assert!(matches!(
        result,
        Err(FilterError::Http(HttpParseError::InvalidJson { .. }))
    ));
}

//-----------------------------------------------------------------------------
// BulkErrorTracker
//-----------------------------------------------------------------------------

#[test]
fn bulk_errors_yield_one_record_per_failed_item() {
    // Arrange
    let response = bulk_response(&[
        ("index", "logs", Some(mapper_error())),
        ("index", "logs", None),
        ("delete", "archive", Some(json!({ "type": "version_conflict" }))),
    ]);
    let event = http_event("POST", "/_bulk", &bulk_body(3), 200, &response);

    // Act
    let records = BulkErrorTracker::filter().derive(&event).unwrap();

    // Assert
    assert_eq!(
        records,
        vec![
            BulkItemError {
                timestamp: TIMESTAMP.to_string(),
                agent: "es-node-1".to_string(),
                source: "10.0.0.7".to_string(),
                uri: "/_bulk".to_string(),
                action: "index".to_string(),
                index: Some("logs".to_string()),
                id: Some("0".to_string()),
                status: Some(400),
                error: mapper_error(),
            },
            BulkItemError {
                timestamp: TIMESTAMP.to_string(),
                agent: "es-node-1".to_string(),
                source: "10.0.0.7".to_string(),
                uri: "/_bulk".to_string(),
                action: "delete".to_string(),
                index: Some("archive".to_string()),
                id: Some("2".to_string()),
                status: Some(400),
                error: json!({ "type": "version_conflict" }),
            },
        ]
    );
}

#[test]
fn clean_bulk_yields_no_errors() {
    // Arrange
    let response = bulk_response(&[("index", "logs", None), ("index", "logs", None)]);
    let event = http_event("POST", "/_bulk", &bulk_body(2), 200, &response);

    // Act
    let records = BulkErrorTracker::filter().derive(&event).unwrap();

    // Assert
    assert!(records.is_empty());
}

#[test]
fn bulk_trackers_are_deterministic() {
    // Arrange
    let response = bulk_response(&[("index", "logs", Some(mapper_error()))]);
    let event = http_event("POST", "/_bulk", &bulk_body(1), 200, &response);
    let mut sizes = BulkSizeTracker::filter();
    let mut errors = BulkErrorTracker::filter();

    // Act / Assert
    assert_eq!(sizes.derive(&event), sizes.derive(&event));
    assert_eq!(errors.derive(&event), errors.derive(&event));
}
