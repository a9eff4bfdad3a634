use crate::filter::{Filter, FilterError};
use crate::http::{Event, HttpExchange, count_ndjson_operations};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

pub const DEFAULT_BULK_ENDPOINT: &str = "/_bulk";

const ITEMS_FIELD: &str = "items";
const INDEX_FIELD: &str = "_index";
const ID_FIELD: &str = "_id";
const STATUS_FIELD: &str = "status";
const ERROR_FIELD: &str = "error";

/// A tracker that only makes sense for bulk-write requests.
///
/// Wrap it in [`BulkOnly`] to get a [`Filter`].
pub trait BulkFilter {
    type Record;

    fn bulk(
        &mut self,
        event: &Event,
        exchange: &HttpExchange<'_>,
    ) -> Result<Vec<Self::Record>, FilterError>;
}

/// Passes only events whose request path is the bulk endpoint to `F`.
///
/// Everything else, including non-HTTP events, yields no records.
#[derive(Debug, Clone)]
pub struct BulkOnly<F> {
    endpoint: String,
    inner: F,
}

impl<F> BulkOnly<F> {
    pub fn new(inner: F) -> Self {
        Self {
            endpoint: DEFAULT_BULK_ENDPOINT.to_string(),
            inner,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl<F: BulkFilter> Filter for BulkOnly<F> {
    type Record = F::Record;

    fn derive(&mut self, event: &Event) -> Result<Vec<Self::Record>, FilterError> {
        let Some(exchange) = event.http() else {
            return Ok(Vec::new());
        };

        if exchange.request.path() != self.endpoint {
            return Ok(Vec::new());
        }

        self.inner.bulk(event, &exchange)
    }
}

//-----------------------------------------------------------------------------
// Bulk response items
//-----------------------------------------------------------------------------

/// `{"items": [{"<action>": {...}}, ...]}`
fn response_items<'e>(exchange: &'e HttpExchange<'_>) -> Result<&'e [Value], FilterError> {
    exchange
        .response
        .json()?
        .get(ITEMS_FIELD)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| FilterError::missing(ITEMS_FIELD))
}

/// The single `action -> result` entry of one item.
fn item_entry(item: &Value) -> Option<(&str, &Map<String, Value>)> {
    let (action, result) = item.as_object()?.iter().next()?;
    Some((action.as_str(), result.as_object()?))
}

fn item_failed(item: &Value) -> bool {
    item_entry(item).is_some_and(|(_, result)| result.contains_key(ERROR_FIELD))
}

fn string_field(result: &Map<String, Value>, field: &str) -> Option<String> {
    result.get(field).and_then(Value::as_str).map(str::to_string)
}

//-----------------------------------------------------------------------------
// Bulk sizes
//-----------------------------------------------------------------------------

/// Size and outcome of one bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkSize {
    pub timestamp: String,
    pub agent: String,
    pub source: String,
    pub code: u16,
    pub method: String,
    pub response_time_ms: u64,
    pub request_len: usize,
    pub response_len: usize,
    pub index: Option<String>,
    pub bulk_size: usize,
    pub bulk_errors: usize,
    pub uri: String,
}

impl fmt::Display for BulkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {} {} {} {}",
            self.timestamp,
            self.agent,
            self.source,
            self.code,
            self.method,
            self.response_time_ms,
            self.request_len,
            self.response_len,
            self.index.as_deref().unwrap_or("-"),
            self.bulk_size,
            self.bulk_errors,
            self.uri,
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BulkSizeTracker;

impl BulkSizeTracker {
    pub fn filter() -> BulkOnly<Self> {
        BulkOnly::new(Self)
    }
}

impl BulkFilter for BulkSizeTracker {
    type Record = BulkSize;

    fn bulk(
        &mut self,
        event: &Event,
        exchange: &HttpExchange<'_>,
    ) -> Result<Vec<BulkSize>, FilterError> {
        let request = &exchange.request;
        let response = &exchange.response;
        let items = response_items(exchange)?;

        let (bulk_size, index) = match items.first() {
            None => (0, None),
            Some(first) => (
                count_ndjson_operations(request.body()?),
                item_entry(first).and_then(|(_, result)| string_field(result, INDEX_FIELD)),
            ),
        };

        Ok(vec![BulkSize {
            timestamp: event.timestamp().to_string(),
            agent: event.agent_id().to_string(),
            source: event.source_ip().to_string(),
            code: response.code(),
            method: request.method().to_string(),
            response_time_ms: event.response_time_ms(),
            request_len: request.length(),
            response_len: response.length(),
            index,
            bulk_size,
            bulk_errors: items.iter().filter(|item| item_failed(item)).count(),
            uri: request.uri().to_string(),
        }])
    }
}

//-----------------------------------------------------------------------------
// Bulk item errors
//-----------------------------------------------------------------------------

/// One failed operation inside a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkItemError {
    pub timestamp: String,
    pub agent: String,
    pub source: String,
    pub uri: String,
    pub action: String,
    pub index: Option<String>,
    pub id: Option<String>,
    pub status: Option<u64>,
    pub error: Value,
}

impl fmt::Display for BulkItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {}",
            self.timestamp,
            self.agent,
            self.source,
            self.action,
            self.index.as_deref().unwrap_or("-"),
            self.id.as_deref().unwrap_or("-"),
            self.status.map_or_else(|| "-".to_string(), |s| s.to_string()),
            self.error,
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BulkErrorTracker;

impl BulkErrorTracker {
    pub fn filter() -> BulkOnly<Self> {
        BulkOnly::new(Self)
    }
}

impl BulkFilter for BulkErrorTracker {
    type Record = BulkItemError;

    fn bulk(
        &mut self,
        event: &Event,
        exchange: &HttpExchange<'_>,
    ) -> Result<Vec<BulkItemError>, FilterError> {
        let records = response_items(exchange)?
            .iter()
            .filter_map(item_entry)
            .filter_map(|(action, result)| {
                let error = result.get(ERROR_FIELD)?;

                Some(BulkItemError {
                    timestamp: event.timestamp().to_string(),
                    agent: event.agent_id().to_string(),
                    source: event.source_ip().to_string(),
                    uri: exchange.request.uri().to_string(),
                    action: action.to_string(),
                    index: string_field(result, INDEX_FIELD),
                    id: string_field(result, ID_FIELD),
                    status: result.get(STATUS_FIELD).and_then(Value::as_u64),
                    error: error.clone(),
                })
            })
            .collect();

        Ok(records)
    }
}
