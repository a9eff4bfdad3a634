mod capture;
mod pipeline;
pub mod tracing;

pub use capture::{AGENT, Capture, TIMESTAMP, bulk_request, bulk_response};
pub use pipeline::{RunOutput, run_over};
pub use tracing::{CapturedEvent, captured, init_test_tracing};
