//! HTTP reconstruction over captured traffic.
//!
//! The capture agent publishes each transaction with the full raw bytes of
//! both directions. Nothing here parses those bytes eagerly: an [`Event`]
//! hands out [`HttpExchange`] views whose header block, headers and JSON
//! body are computed on first access.

mod error;
mod event;
mod message;
pub mod parse;
mod record;

pub use error::*;
pub use event::*;
pub use message::{HttpExchange, Request, Response};
pub use parse::{Headers, count_ndjson_operations, parse_headers, split_path, split_slugs};
pub use record::*;
