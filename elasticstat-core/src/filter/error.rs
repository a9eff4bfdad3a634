use crate::http::HttpParseError;
use thiserror::Error;

/// Why a filter could not derive records from one event.
///
/// The event is skipped; the stream continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error(transparent)]
    Http(#[from] HttpParseError),

    #[error("response body has no usable `{field}` field")]
    MissingField { field: &'static str },
}

impl FilterError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}
