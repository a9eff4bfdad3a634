use thiserror::Error;

/// Failure to reconstruct HTTP structure from a captured payload.
///
/// Every variant is scoped to a single record: filters skip the record and
/// keep consuming the stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpParseError {
    #[error("no blank line separates the header block from the body")]
    MissingSeparator,

    #[error("malformed header line {line:?}")]
    MalformedHeader { line: String },

    #[error("body is not valid JSON: {reason}")]
    InvalidJson { reason: String },
}

impl HttpParseError {
    pub fn invalid_json(source: serde_json::Error) -> Self {
        Self::InvalidJson {
            reason: source.to_string(),
        }
    }
}
