use crate::http::parse::{Headers, parse_headers, split_message, split_path, split_slugs};
use crate::http::record::{RequestMeta, ResponseMeta};
use crate::http::HttpParseError;
use once_cell::unsync::OnceCell;
use serde_json::Value;
#[cfg(test)]
use std::cell::Cell;

/// Lazily-split view over one captured HTTP message.
///
/// The header/body split, the parsed headers and the parsed JSON body are each
/// computed on first access and cached for the life of the view.
pub(crate) struct RawMessage<'a> {
    raw: &'a str,
    parts: OnceCell<Result<(&'a str, &'a str), HttpParseError>>,
    headers: OnceCell<Result<Headers, HttpParseError>>,
    json: OnceCell<Result<Value, HttpParseError>>,

    #[cfg(test)]
    pub(crate) splits: Cell<usize>,
    #[cfg(test)]
    pub(crate) json_parses: Cell<usize>,
}

impl<'a> RawMessage<'a> {
    pub(crate) fn new(raw: &'a str) -> Self {
        Self {
            raw,
            parts: OnceCell::new(),
            headers: OnceCell::new(),
            json: OnceCell::new(),
            #[cfg(test)]
            splits: Cell::new(0),
            #[cfg(test)]
            json_parses: Cell::new(0),
        }
    }

    fn parts(&self) -> Result<(&'a str, &'a str), HttpParseError> {
        self.parts
            .get_or_init(|| {
                #[cfg(test)]
                self.splits.set(self.splits.get() + 1);

                split_message(self.raw)
            })
            .clone()
    }

    pub(crate) fn header(&self) -> Result<&'a str, HttpParseError> {
        self.parts().map(|(header, _)| header)
    }

    pub(crate) fn body(&self) -> Result<&'a str, HttpParseError> {
        self.parts().map(|(_, body)| body)
    }

    pub(crate) fn headers(&self) -> Result<&Headers, HttpParseError> {
        self.headers
            .get_or_init(|| self.header().and_then(parse_headers))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub(crate) fn json(&self) -> Result<&Value, HttpParseError> {
        self.json
            .get_or_init(|| -> Result<Value, HttpParseError> {
                #[cfg(test)]
                self.json_parses.set(self.json_parses.get() + 1);

                let body = self.body()?;
                serde_json::from_str(body).map_err(HttpParseError::invalid_json)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub(crate) fn len(&self) -> usize {
        self.raw.len()
    }
}

/// Both directions of one captured exchange.
pub struct HttpExchange<'a> {
    pub request: Request<'a>,
    pub response: Response<'a>,
}

/// Request view over the captured request bytes.
///
/// `host`, `uri` and `method` come from the agent's metadata; they are never
/// re-parsed from the raw start line.
pub struct Request<'a> {
    host: &'a str,
    meta: &'a RequestMeta,
    pub(crate) message: RawMessage<'a>,
}

impl<'a> Request<'a> {
    pub(crate) fn new(host: &'a str, meta: &'a RequestMeta, raw: &'a str) -> Self {
        Self {
            host,
            meta,
            message: RawMessage::new(raw),
        }
    }

    pub fn host(&self) -> &'a str {
        self.host
    }

    pub fn uri(&self) -> &'a str {
        &self.meta.uri
    }

    pub fn method(&self) -> &'a str {
        &self.meta.method
    }

    /// URI with the query string stripped.
    pub fn path(&self) -> &'a str {
        split_path(self.uri()).0
    }

    pub fn query_string(&self) -> Option<&'a str> {
        split_path(self.uri()).1
    }

    pub fn slugs(&self) -> Vec<&'a str> {
        split_slugs(self.path())
    }

    pub fn header(&self) -> Result<&'a str, HttpParseError> {
        self.message.header()
    }

    pub fn headers(&self) -> Result<&Headers, HttpParseError> {
        self.message.headers()
    }

    pub fn body(&self) -> Result<&'a str, HttpParseError> {
        self.message.body()
    }

    /// Byte length of the whole captured request, header block included.
    pub fn length(&self) -> usize {
        self.message.len()
    }

    /// Parses the body as a single JSON document.
    ///
    /// Bulk bodies are NDJSON and always fail here.
    pub fn json(&self) -> Result<&Value, HttpParseError> {
        self.message.json()
    }
}

/// Response view over the captured response bytes.
pub struct Response<'a> {
    meta: &'a ResponseMeta,
    pub(crate) message: RawMessage<'a>,
}

impl<'a> Response<'a> {
    pub(crate) fn new(meta: &'a ResponseMeta, raw: &'a str) -> Self {
        Self {
            meta,
            message: RawMessage::new(raw),
        }
    }

    pub fn code(&self) -> u16 {
        self.meta.code
    }

    pub fn header(&self) -> Result<&'a str, HttpParseError> {
        self.message.header()
    }

    pub fn headers(&self) -> Result<&Headers, HttpParseError> {
        self.message.headers()
    }

    pub fn body(&self) -> Result<&'a str, HttpParseError> {
        self.message.body()
    }

    pub fn length(&self) -> usize {
        self.message.len()
    }

    pub fn json(&self) -> Result<&Value, HttpParseError> {
        self.message.json()
    }
}
