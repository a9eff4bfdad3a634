use crate::http::message::{HttpExchange, Request, Response};
use crate::http::record::CapturedRecord;

/// One captured transaction, as consumed by the filters.
///
/// Connection metadata is exposed eagerly. HTTP structure is only built when
/// [`Event::http`] is called, and the returned views do the header/body work
/// on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    record: CapturedRecord,
}

impl Event {
    pub fn new(record: CapturedRecord) -> Self {
        Self { record }
    }

    /// Decodes one JSON-encoded record as published on the feed.
    pub fn from_slice(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload).map(Self::new)
    }

    pub fn record(&self) -> &CapturedRecord {
        &self.record
    }

    pub fn timestamp(&self) -> &str {
        &self.record.timestamp
    }

    pub fn response_time_ms(&self) -> u64 {
        self.record.response_time_ms
    }

    pub fn source_ip(&self) -> &str {
        &self.record.src_ip
    }

    pub fn source_port(&self) -> u16 {
        self.record.src_port
    }

    pub fn dest_ip(&self) -> &str {
        &self.record.dst_ip
    }

    pub fn dest_port(&self) -> u16 {
        self.record.dst_port
    }

    pub fn agent_id(&self) -> &str {
        &self.record.agent
    }

    pub fn is_http(&self) -> bool {
        self.record.http.is_some()
    }

    /// Builds fresh request/response views, or `None` for non-HTTP records.
    pub fn http(&self) -> Option<HttpExchange<'_>> {
        let meta = self.record.http.as_ref()?;

        Some(HttpExchange {
            request: Request::new(&meta.host, &meta.request, &self.record.request_raw),
            response: Response::new(&meta.response, &self.record.response_raw),
        })
    }
}
