/**
 * Sliding-Window Rate Limiter
 *
 * Decides admit/reject for a request from one identity under its
 * resolved plan. All bookkeeping lives in the shared fast store, so any
 * number of server processes arrive at the same decision for the same
 * identity.
 *
 * # Algorithm
 *
 * For each check, the limiter asks the store to atomically purge
 * entries older than the plan's window, record the current timestamp,
 * and report the post-insert count. A count above the plan's maximum
 * rejects the request. The rejected attempt itself stays recorded, so a
 * client hammering a closed window keeps the window closed instead of
 * resetting it.
 *
 * # Failure Policy
 *
 * Store errors propagate to the caller. The HTTP middleware is the
 * component that fails open; the limiter itself reports what happened.
 */

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::cache::{FastStore, FastStoreError};
use crate::plans::Plan;

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request is admitted
    Allowed {
        /// Requests left in the current window
        remaining: u64,
    },
    /// The request is rejected
    Rejected {
        /// Upper bound on the wait before the window can admit again
        retry_after: Duration,
    },
}

impl Decision {
    /// Whether the request was admitted
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Plan-aware sliding-window rate limiter over the shared fast store.
#[derive(Clone)]
pub struct SlidingWindowLimiter {
    store: Arc<dyn FastStore>,
}

impl SlidingWindowLimiter {
    pub fn new(store: Arc<dyn FastStore>) -> Self {
        Self { store }
    }

    /// Window key for one identity.
    fn key(identity: &str) -> String {
        format!("rate-limit:{identity}")
    }

    /// Check and record a request happening now.
    pub async fn check_and_record(
        &self,
        identity: &str,
        plan: Plan,
    ) -> Result<Decision, FastStoreError> {
        self.check_and_record_at(identity, plan, epoch_millis()).await
    }

    /// Check and record a request at an explicit timestamp.
    ///
    /// The explicit clock is what makes window-expiry behavior
    /// observable without waiting out a real window.
    pub async fn check_and_record_at(
        &self,
        identity: &str,
        plan: Plan,
        now_ms: u64,
    ) -> Result<Decision, FastStoreError> {
        let count = self
            .store
            .record_in_window(&Self::key(identity), now_ms, plan.window())
            .await?;

        if count > plan.max_requests() {
            tracing::debug!(
                "[RateLimit] rejected {identity}: {count} requests in window (max {})",
                plan.max_requests()
            );
            Ok(Decision::Rejected {
                retry_after: plan.window(),
            })
        } else {
            Ok(Decision::Allowed {
                remaining: plan.max_requests() - count,
            })
        }
    }
}

/// Current time as epoch milliseconds.
fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
