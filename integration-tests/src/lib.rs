//! Shared harness for end-to-end runs over in-memory feeds.

pub mod harness;
