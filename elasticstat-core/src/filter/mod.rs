//! Stream transforms from [`Event`](crate::http::Event)s to derived records.
//!
//! Every tracker implements [`Filter`]; [`FilterExt::records`] drives one over
//! an event iterator lazily and in order. Bulk-specific trackers implement
//! [`BulkFilter`] instead and are plugged in through [`BulkOnly`].

mod bulk;
mod error;
mod error_tracker;
mod pipeline;
mod slow_search;
mod user_activity;

#[cfg(test)]
mod tests;

pub use bulk::{
    BulkErrorTracker, BulkFilter, BulkItemError, BulkOnly, BulkSize, BulkSizeTracker,
    DEFAULT_BULK_ENDPOINT,
};
pub use error::FilterError;
pub use error_tracker::{DEFAULT_MIN_ERROR_CODE, ErrorReport, ErrorTracker, RequestDescriptor};
pub use pipeline::{Filter, FilterExt, Records};
pub use slow_search::{DEFAULT_SEARCH_ENDPOINT, SlowSearch, SlowSearchTracker};
pub use user_activity::{
    BULK_ACTION, UNKNOWN_ACTION, UserActivity, UserActivityTracker, derive_action,
};
