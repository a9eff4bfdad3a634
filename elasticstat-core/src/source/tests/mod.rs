mod event_source_tests;

use crate::source::{Feed, FeedError};
use std::collections::VecDeque;

/// Feed that replays a fixed script of poll results.
pub(crate) struct ScriptedFeed {
    script: VecDeque<Result<Option<Vec<u8>>, FeedError>>,
}

impl ScriptedFeed {
    pub(crate) fn new(script: Vec<Result<Option<Vec<u8>>, FeedError>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Feed for ScriptedFeed {
    fn next_payload(&mut self) -> Result<Option<Vec<u8>>, FeedError> {
        self.script.pop_front().unwrap_or(Ok(None))
    }
}

pub(crate) fn connection_reset() -> FeedError {
    FeedError::transport(redis::RedisError::from((
        redis::ErrorKind::IoError,
        "connection reset",
    )))
}
