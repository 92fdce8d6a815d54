//! Sliding-window rate limiter for outbound Aircall requests.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Length of the sliding window.
const WINDOW: Duration = Duration::from_secs(60);

/// Extra delay added after the oldest grant leaves the window.
const SAFETY_MARGIN: Duration = Duration::from_millis(100);

/// Bounds requests to `requests_per_minute` grants in any trailing 60 seconds.
///
/// The window is only read and written while holding the lock, and a grant
/// is recorded in the same critical section that decides it, so a caller
/// dropped while waiting never leaves a partial entry behind.
#[derive(Debug)]
pub struct RateLimiter {
    requests_per_minute: usize,
    grants: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_minute` grants per window.
    ///
    /// A limit of zero is treated as one.
    pub fn new(requests_per_minute: u32) -> Self {
        let limit = requests_per_minute.max(1) as usize;
        Self {
            requests_per_minute: limit,
            grants: Mutex::new(VecDeque::with_capacity(limit)),
        }
    }

    /// Configured grants per window.
    pub fn limit(&self) -> usize {
        self.requests_per_minute
    }

    /// Wait until a request slot is available, then record it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut grants = self.grants.lock().await;
                let now = Instant::now();

                while grants
                    .front()
                    .is_some_and(|&t| now.saturating_duration_since(t) > WINDOW)
                {
                    grants.pop_front();
                }

                match grants.front() {
                    Some(&oldest) if grants.len() >= self.requests_per_minute => {
                        (oldest + WINDOW + SAFETY_MARGIN).saturating_duration_since(now)
                    }
                    _ => {
                        grants.push_back(now);
                        return;
                    }
                }
            };

            if wait.is_zero() {
                continue;
            }

            debug!("Rate limit reached, waiting {:.1}s", wait.as_secs_f64());
            sleep(wait).await;
        }
    }

    /// Number of grants currently inside the window.
    pub async fn in_flight(&self) -> usize {
        let grants = self.grants.lock().await;
        let now = Instant::now();
        grants
            .iter()
            .filter(|&&t| now.saturating_duration_since(t) <= WINDOW)
            .count()
    }
}
