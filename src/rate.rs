//! Rate gate between consecutive remote requests.

use std::time::Duration;
use tracing::debug;

/// Suspends the pipeline between two lookups.
#[allow(async_fn_in_trait)]
pub trait Pause {
    async fn pause(&mut self);
}

/// Sleeps for a constant interval on every call
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    interval: Duration,
}

impl FixedDelay {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Pause for FixedDelay {
    async fn pause(&mut self) {
        debug!("Rate gate: sleeping {:?}", self.interval);
        tokio::time::sleep(self.interval).await;
    }
}
