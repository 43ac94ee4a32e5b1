//! Bounded retry with linear backoff
//!
//! One policy object applied uniformly to every page request: an initial
//! attempt plus up to `max_retries` retries, waiting `base_delay * attempt`
//! before retry number `attempt`. After the last retry the final error is
//! returned to the caller.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry bound and backoff slope for transient request failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt
    pub max_retries: u32,

    /// Backoff unit; retry N waits N times this
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create a new policy
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Backoff before retry `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Run `op` under `policy`, sleeping between attempts
///
/// `what` labels the operation in retry warnings.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if attempt > policy.max_retries {
                    warn!(
                        "{} failed after {} retries: {}",
                        what, policy.max_retries, e
                    );
                    return Err(e);
                }

                let delay = policy.delay_for(attempt);
                warn!(
                    "{} failed, retrying ({}/{}) in {:.1}s: {}",
                    what,
                    attempt,
                    policy.max_retries,
                    delay.as_secs_f64(),
                    e
                );
                sleep(delay).await;
            }
        }
    }
}
