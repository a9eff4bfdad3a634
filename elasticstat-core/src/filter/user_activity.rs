use crate::filter::{Filter, FilterError};
use crate::http::{Event, count_ndjson_operations};
use serde::Serialize;
use std::fmt;

/// Prefix of Elasticsearch endpoint slugs (`_search`, `_bulk`, ...).
const ACTION_MARKER: char = '_';

pub const UNKNOWN_ACTION: &str = "?";
pub const BULK_ACTION: &str = "bulk";

const USER_AGENT_HEADER: &str = "user-agent";

/// Names the endpoint a request hits.
///
/// The last slug wins when it carries the marker, then the first one;
/// `/logs/_search` and `/_cat/indices` give `search` and `cat`.
pub fn derive_action(slugs: &[&str]) -> String {
    slugs
        .last()
        .and_then(marked)
        .or_else(|| slugs.first().and_then(marked))
        .unwrap_or(UNKNOWN_ACTION)
        .to_string()
}

fn marked<'a>(slug: &&'a str) -> Option<&'a str> {
    slug.strip_prefix(ACTION_MARKER)
}

/// Who did what, per HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserActivity {
    pub timestamp: String,
    pub agent: String,
    pub response_time_ms: u64,
    pub source: String,
    pub dest: String,
    pub user_agent: String,
    pub method: String,
    pub action: String,
    pub uri: String,
    pub bulk_count: usize,
    pub request_len: usize,
    pub response_len: usize,
}

impl fmt::Display for UserActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {} {} {} \"{}\"",
            self.timestamp,
            self.agent,
            self.response_time_ms,
            self.source,
            self.dest,
            self.method,
            self.action,
            self.uri,
            self.bulk_count,
            self.request_len,
            self.response_len,
            self.user_agent,
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UserActivityTracker;

impl Filter for UserActivityTracker {
    type Record = UserActivity;

    fn derive(&mut self, event: &Event) -> Result<Vec<UserActivity>, FilterError> {
        let Some(exchange) = event.http() else {
            return Ok(Vec::new());
        };
        let request = &exchange.request;

        let action = derive_action(&request.slugs());
        let bulk_count = if action == BULK_ACTION {
            count_ndjson_operations(request.body()?)
        } else {
            0
        };
        let user_agent = request
            .headers()?
            .get(USER_AGENT_HEADER)
            .cloned()
            .unwrap_or_default();

        Ok(vec![UserActivity {
            timestamp: event.timestamp().to_string(),
            agent: event.agent_id().to_string(),
            response_time_ms: event.response_time_ms(),
            source: format!("{}:{}", event.source_ip(), event.source_port()),
            dest: format!("{}:{}", event.dest_ip(), event.dest_port()),
            user_agent,
            method: request.method().to_string(),
            action,
            uri: request.uri().to_string(),
            bulk_count,
            request_len: request.length(),
            response_len: exchange.response.length(),
        }])
    }
}
