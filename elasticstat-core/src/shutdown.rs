use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Longest uninterrupted sleep inside [`Shutdown::sleep`].
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Cooperative cancellation flag shared by the feed, the pipeline and the
/// Ctrl-C handler.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Raises the flag on SIGINT/SIGTERM instead of exiting, so the current
    /// record is finished and sinks are flushed.
    pub fn install_ctrlc_handler(&self) -> Result<(), ctrlc::Error> {
        let shutdown = self.clone();

        ctrlc::set_handler(move || {
            tracing::info!("shutdown requested");
            shutdown.request();
        })
    }

    /// Sleeps for `duration` unless shutdown is requested first.
    ///
    /// Returns `false` when woken by a shutdown request.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;

        loop {
            if self.is_requested() {
                return false;
            }

            let now = Instant::now();
            if now >= deadline {
                return true;
            }

            thread::sleep((deadline - now).min(SLEEP_SLICE));
        }
    }
}
