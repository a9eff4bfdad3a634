use crate::conf::{Config, ConfigError, StatsdConfig, validate_config};

fn invalid_field(config: &Config) -> &'static str {
    match validate_config(config) {
        Err(ConfigError::Invalid { field, .. }) => field,
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn defaults_are_valid() {
    assert!(validate_config(&Config::default()).is_ok());
}

#[test]
fn rejects_empty_queue() {
    // Arrange
    let mut config = Config::default();
    config.feed.queue = "  ".to_string();

    // Act / Assert
    assert_eq!(invalid_field(&config), "feed.queue");
}

#[test]
fn rejects_bad_glob_pattern() {
    // Arrange
    let mut config = Config::default();
    config.feed.pattern = Some("/packetbeat/[".to_string());

    // Act / Assert
    assert_eq!(invalid_field(&config), "feed.pattern");
}

#[test]
fn accepts_glob_pattern() {
    // Arrange
    let mut config = Config::default();
    config.feed.pattern = Some("/packetbeat/es-*".to_string());

    // Act / Assert
    assert!(validate_config(&config).is_ok());
}

#[test]
fn rejects_zero_idle_backoff() {
    // Arrange
    let mut config = Config::default();
    config.feed.idle_backoff_ms = 0;

    // Act / Assert
    assert_eq!(invalid_field(&config), "feed.idle_backoff_ms");
}

#[test]
fn rejects_relative_bulk_endpoint() {
    // Arrange
    let mut config = Config::default();
    config.filters.bulk_endpoint = "_bulk".to_string();

    // Act / Assert
    assert_eq!(invalid_field(&config), "filters.bulk_endpoint");
}

#[test]
fn rejects_search_endpoint_with_slash() {
    // Arrange
    let mut config = Config::default();
    config.filters.search_endpoint = "/_search".to_string();

    // Act / Assert
    assert_eq!(invalid_field(&config), "filters.search_endpoint");
}

#[test]
fn rejects_out_of_range_error_code() {
    // Arrange
    let mut config = Config::default();
    config.filters.min_error_code = 42;

    // Act / Assert
    assert_eq!(invalid_field(&config), "filters.min_error_code");
}

#[test]
fn rejects_blank_statsd_address() {
    // Arrange
    let mut config = Config::default();
    config.sinks.statsd = Some(StatsdConfig {
        address: String::new(),
        ..Default::default()
    });

    // Act / Assert
    assert_eq!(invalid_field(&config), "sinks.statsd.address");
}
