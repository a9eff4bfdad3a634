use crate::filter::{Filter, FilterError};
use crate::http::{Event, Headers, HttpParseError};
use serde_json::Value;

pub const DEFAULT_MIN_ERROR_CODE: u16 = 400;

/// Minimal description of the failing request, as an error tracker expects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: String,
    /// Host followed by path, without the query string.
    pub url: String,
    pub path: String,
    pub query_string: Option<String>,
    pub headers: Headers,
}

/// An HTTP exchange that ended in an error status.
///
/// `request_json` fails for bulk requests: their NDJSON body is not one
/// document, so consumers must fall back to `request_body`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    pub timestamp: String,
    pub agent: String,
    pub source_ip: String,
    pub code: u16,
    pub response_time_ms: u64,
    pub request: RequestDescriptor,
    pub request_json: Result<Value, HttpParseError>,
    pub response_json: Result<Value, HttpParseError>,
    pub request_body: String,
}

#[derive(Debug, Clone)]
pub struct ErrorTracker {
    min_code: u16,
}

impl Default for ErrorTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ERROR_CODE)
    }
}

impl ErrorTracker {
    pub fn new(min_code: u16) -> Self {
        Self { min_code }
    }
}

impl Filter for ErrorTracker {
    type Record = ErrorReport;

    fn derive(&mut self, event: &Event) -> Result<Vec<ErrorReport>, FilterError> {
        let Some(exchange) = event.http() else {
            return Ok(Vec::new());
        };
        let request = &exchange.request;
        let response = &exchange.response;

        if response.code() < self.min_code {
            return Ok(Vec::new());
        }

        let descriptor = RequestDescriptor {
            method: request.method().to_string(),
            url: format!("{}{}", request.host(), request.path()),
            path: request.path().to_string(),
            query_string: request.query_string().map(str::to_string),
            headers: request.headers()?.clone(),
        };

        Ok(vec![ErrorReport {
            timestamp: event.timestamp().to_string(),
            agent: event.agent_id().to_string(),
            source_ip: event.source_ip().to_string(),
            code: response.code(),
            response_time_ms: event.response_time_ms(),
            request: descriptor,
            request_json: request.json().cloned(),
            response_json: response.json().cloned(),
            request_body: request.body()?.to_string(),
        }])
    }
}
