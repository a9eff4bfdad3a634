use crate::conf::{Config, ConfigError};
use glob::Pattern;

/// Semantic checks serde cannot express. Stops at the first problem.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let feed = &config.feed;

    if feed.host.trim().is_empty() {
        return Err(ConfigError::invalid("feed.host", "must not be empty"));
    }

    if feed.queue.trim().is_empty() {
        return Err(ConfigError::invalid("feed.queue", "must not be empty"));
    }

    if let Some(pattern) = &feed.pattern {
        Pattern::new(pattern)
            .map_err(|e| ConfigError::invalid("feed.pattern", format!("{pattern:?}: {e}")))?;
    }

    if feed.pop_timeout_secs == 0 {
        return Err(ConfigError::invalid(
            "feed.pop_timeout_secs",
            "0 would block forever and never observe shutdown",
        ));
    }

    if feed.idle_backoff_ms == 0 {
        return Err(ConfigError::invalid(
            "feed.idle_backoff_ms",
            "must be at least 1",
        ));
    }

    let filters = &config.filters;

    if !filters.bulk_endpoint.starts_with('/') {
        return Err(ConfigError::invalid(
            "filters.bulk_endpoint",
            format!("{:?} is not a path", filters.bulk_endpoint),
        ));
    }

    if filters.search_endpoint.is_empty() || filters.search_endpoint.contains('/') {
        return Err(ConfigError::invalid(
            "filters.search_endpoint",
            format!("{:?} is not a single path segment", filters.search_endpoint),
        ));
    }

    if !(100..=599).contains(&filters.min_error_code) {
        return Err(ConfigError::invalid(
            "filters.min_error_code",
            format!("{} is not an HTTP status", filters.min_error_code),
        ));
    }

    if let Some(statsd) = &config.sinks.statsd
        && statsd.address.trim().is_empty()
    {
        return Err(ConfigError::invalid("sinks.statsd.address", "must not be empty"));
    }

    if config.sinks.slow_search.prefix.is_empty() {
        return Err(ConfigError::invalid(
            "sinks.slow_search.prefix",
            "must not be empty",
        ));
    }

    if config.relay.publish_prefix.is_empty() {
        return Err(ConfigError::invalid(
            "relay.publish_prefix",
            "must not be empty",
        ));
    }

    Ok(())
}
