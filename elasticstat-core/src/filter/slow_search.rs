use crate::filter::{Filter, FilterError};
use crate::http::Event;
use serde::Serialize;
use std::fmt;

pub const DEFAULT_SEARCH_ENDPOINT: &str = "_search";

/// A search request and how long it took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlowSearch {
    pub timestamp: String,
    pub response_time_ms: u64,
    /// Path segments before the endpoint, usually index names.
    pub indices: Vec<String>,
}

impl fmt::Display for SlowSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.timestamp,
            self.response_time_ms,
            self.indices.join(",")
        )
    }
}

impl SlowSearch {
    /// `timestamp;response_time;index,index`
    pub fn to_csv_line(&self) -> String {
        format!(
            "{};{};{}",
            self.timestamp,
            self.response_time_ms,
            self.indices.join(",")
        )
    }
}

#[derive(Debug, Clone)]
pub struct SlowSearchTracker {
    endpoint: String,
    min_response_time_ms: u64,
}

impl Default for SlowSearchTracker {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            min_response_time_ms: 0,
        }
    }
}

impl SlowSearchTracker {
    pub fn new(endpoint: impl Into<String>, min_response_time_ms: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            min_response_time_ms,
        }
    }
}

impl Filter for SlowSearchTracker {
    type Record = SlowSearch;

    fn derive(&mut self, event: &Event) -> Result<Vec<SlowSearch>, FilterError> {
        let Some(exchange) = event.http() else {
            return Ok(Vec::new());
        };

        let slugs = exchange.request.slugs();
        let Some((last, indices)) = slugs.split_last() else {
            return Ok(Vec::new());
        };

        if *last != self.endpoint || event.response_time_ms() < self.min_response_time_ms {
            return Ok(Vec::new());
        }

        Ok(vec![SlowSearch {
            timestamp: event.timestamp().to_string(),
            response_time_ms: event.response_time_ms(),
            indices: indices.iter().map(|slug| slug.to_string()).collect(),
        }])
    }
}
