//! Structured decomposition of Elasticsearch exception traces.
//!
//! Search failures come back as one flattened string:
//!
//! ```text
//! SearchPhaseExecutionException[<description>; shardFailures {[node][index][shard]: Cause[..]; nested: Cause[..]; }...]
//! ```
//!
//! [`TraceParser`] turns that into a per-shard cause chain with the boring
//! wrapper types removed. Any other exception keeps its raw detail text.

mod error;
mod parser;
mod types;

#[cfg(test)]
mod tests;

pub use error::TraceParseError;
pub use parser::{DEFAULT_BORING_EXCEPTIONS, TraceParser, parse_elasticsearch_error};
pub use types::{ElasticsearchError, ExceptionNode, ShardFailure, ShardKey};
