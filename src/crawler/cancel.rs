use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag asking a running crawl to stop
///
/// The engine checks it between node visits. Clones share the same flag, so
/// a signal handler can hold one while the crawl thread holds another.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
