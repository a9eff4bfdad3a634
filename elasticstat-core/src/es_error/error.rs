use thiserror::Error;

/// The error string did not follow the exception-trace grammar.
///
/// Callers fall back to reporting the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceParseError {
    #[error("exception trace has no '[' after the exception name")]
    MissingBracket,

    #[error("{name} trace does not match the shard failure layout")]
    UnrecognizedFormat { name: String },

    #[error("nested cause {cause:?} has no '[' after its name")]
    MalformedCause { cause: String },
}
