use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Fatal: no feed at startup means nothing to analyze.
    #[error("failed to connect to feed at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: redis::RedisError,
    },

    #[error("feed transport error: {source}")]
    Transport {
        #[source]
        source: redis::RedisError,
    },

    #[error("undecodable feed message: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read feed input: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

impl FeedError {
    pub fn connect(url: impl Into<String>, source: redis::RedisError) -> Self {
        Self::Connect {
            url: url.into(),
            source,
        }
    }

    pub fn transport(source: redis::RedisError) -> Self {
        Self::Transport { source }
    }

    pub fn decode(source: serde_json::Error) -> Self {
        Self::Decode { source }
    }

    pub fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }

    /// Whether polling the same feed again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Decode { .. })
    }
}
