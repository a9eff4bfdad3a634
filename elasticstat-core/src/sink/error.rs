use std::path::PathBuf;
use thiserror::Error;

/// A record could not be delivered. The stream goes on regardless.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode record: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error("record timestamp {timestamp:?} does not start with a YYYY-MM-DD date")]
    InvalidTimestamp { timestamp: String },
}

impl SinkError {
    pub fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }

    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    pub fn encode(source: serde_json::Error) -> Self {
        Self::Encode { source }
    }
}
