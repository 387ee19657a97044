//! Bounded retry loop around a single probe attempt

use crate::model::ProbeOutcome;
use crate::status::classify;
use std::future::Future;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Run `attempt` until it yields an available outcome or the retry
    /// budget is spent. At least one attempt is always made, and the last
    /// attempt's status is the one recorded.
    pub async fn run<F, Fut>(&self, url: &str, mut attempt: F) -> ProbeOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = String>,
    {
        let mut attempts_made = 0;

        loop {
            attempts_made += 1;
            let raw_status = attempt().await;
            let is_available = classify(&raw_status).is_available;

            debug!(
                url = %url,
                attempt = attempts_made,
                status = %raw_status,
                "Probe attempt finished"
            );

            if is_available || attempts_made > self.max_retries {
                return ProbeOutcome {
                    raw_status,
                    is_available,
                    attempts_made,
                };
            }

            warn!(
                "Probe of {} unavailable (attempt {} of {}): {}, retrying",
                url,
                attempts_made,
                self.max_retries + 1,
                raw_status
            );
        }
    }
}
