//! Sliding window rate limiter kept in process memory

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use otp_core::{RateLimitDecision, RateLimiter};
use otp_shared::RateLimitConfig;

/// At most `limit` issuance attempts per identity within a trailing `window`
///
/// Every call to [`admit`](RateLimiter::admit) is recorded, allowed or
/// denied, so a client hammering the endpoint stays locked out. Only the most
/// recent `limit` attempts are kept per identity; that is all the decision and
/// the retry hint need.
pub struct SlidingWindowRateLimiter {
    limit: u32,
    window: Duration,
    attempts: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowRateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_attempts, config.window())
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of identities with recorded attempts
    pub async fn tracked_identities(&self) -> usize {
        self.attempts.lock().await.len()
    }

    /// Forget identities whose newest attempt has left the window
    pub async fn purge_idle(&self) -> usize {
        let now = Instant::now();
        let window = self.window;
        let mut attempts = self.attempts.lock().await;
        let before = attempts.len();
        attempts.retain(|_, history| {
            history
                .back()
                .map_or(false, |newest| now.duration_since(*newest) < window)
        });
        before - attempts.len()
    }

    /// Run [`purge_idle`](Self::purge_idle) every `interval` until the limiter is dropped
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let limiter: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(live) = limiter.upgrade() else {
                    break;
                };
                let purged = live.purge_idle().await;
                if purged > 0 {
                    debug!(purged, "Purged idle rate limit windows");
                }
            }
        })
    }
}

impl From<&RateLimitConfig> for SlidingWindowRateLimiter {
    fn from(config: &RateLimitConfig) -> Self {
        Self::from_config(config)
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowRateLimiter {
    async fn admit(&self, identity: &str) -> RateLimitDecision {
        if self.limit == 0 {
            return RateLimitDecision::deny(self.window, self.limit, self.window);
        }

        let now = Instant::now();
        let limit = self.limit as usize;
        let mut attempts = self.attempts.lock().await;
        let history = attempts.entry(identity.to_string()).or_default();

        while let Some(oldest) = history.front() {
            if now.duration_since(*oldest) >= self.window {
                history.pop_front();
            } else {
                break;
            }
        }

        let allowed = history.len() < limit;

        history.push_back(now);
        while history.len() > limit {
            history.pop_front();
        }

        if allowed {
            return RateLimitDecision::allow(self.limit, self.window);
        }

        // The window holds `limit` attempts including this one; the next call
        // is admitted once the oldest of them leaves.
        let retry_after = history
            .front()
            .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
            .unwrap_or(self.window);

        RateLimitDecision::deny(retry_after, self.limit, self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn test_tenth_allowed_eleventh_denied() {
        let limiter = SlidingWindowRateLimiter::new(10, WINDOW);

        for i in 1..=10 {
            let decision = limiter.admit("13800000000").await;
            assert!(decision.allowed, "attempt {} should be allowed", i);
            assert_eq!(decision.retry_after, Duration::ZERO);
        }

        let decision = limiter.admit("13800000000").await;
        assert!(!decision.allowed);
        assert_eq!(decision.retry_after, WINDOW);
        assert_eq!(decision.limit, 10);
        assert_eq!(decision.window, WINDOW);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_attempts_admit_exactly_limit() {
        let limiter = Arc::new(SlidingWindowRateLimiter::new(10, WINDOW));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.admit("13800000000").await.allowed })
            })
            .collect();

        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 10);
        assert!(!limiter.admit("13800000000").await.allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identities_are_independent() {
        let limiter = SlidingWindowRateLimiter::new(1, WINDOW);
        assert!(limiter.admit("13800000000").await.allowed);
        assert!(!limiter.admit("13800000000").await.allowed);
        assert!(limiter.admit("13900000000").await.allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_counts_down() {
        let limiter = SlidingWindowRateLimiter::new(2, WINDOW);
        limiter.admit("13800000000").await;
        tokio::time::advance(Duration::from_secs(100)).await;
        limiter.admit("13800000000").await;
        tokio::time::advance(Duration::from_secs(50)).await;

        // Oldest retained attempt is now the one at t=100
        let decision = limiter.admit("13800000000").await;
        assert!(!decision.allowed);
        assert_eq!(decision.retry_after, Duration::from_secs(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_admitted_again_after_retry_after() {
        let limiter = SlidingWindowRateLimiter::new(3, WINDOW);
        for _ in 0..3 {
            assert!(limiter.admit("13800000000").await.allowed);
        }

        let denied = limiter.admit("13800000000").await;
        assert!(!denied.allowed);

        tokio::time::advance(denied.retry_after).await;
        assert!(limiter.admit("13800000000").await.allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_attempts_are_recorded() {
        let limiter = SlidingWindowRateLimiter::new(2, WINDOW);
        limiter.admit("13800000000").await;
        limiter.admit("13800000000").await;

        tokio::time::advance(Duration::from_secs(200)).await;
        assert!(!limiter.admit("13800000000").await.allowed);

        // The first two attempts have left the window; the denied one at
        // t=200 has not and still takes a slot.
        tokio::time::advance(Duration::from_secs(100)).await;
        assert!(limiter.admit("13800000000").await.allowed);
        let decision = limiter.admit("13800000000").await;
        assert!(!decision.allowed);
        assert_eq!(decision.retry_after, WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_idle_drops_stale_identities() {
        let limiter = SlidingWindowRateLimiter::new(10, WINDOW);
        limiter.admit("13800000000").await;
        tokio::time::advance(Duration::from_secs(200)).await;
        limiter.admit("13900000000").await;

        tokio::time::advance(Duration::from_secs(100)).await;
        assert_eq!(limiter.purge_idle().await, 1);
        assert_eq!(limiter.tracked_identities().await, 1);
    }

    #[tokio::test]
    async fn test_zero_limit_denies_everything() {
        let limiter = SlidingWindowRateLimiter::new(0, WINDOW);
        let decision = limiter.admit("13800000000").await;
        assert!(!decision.allowed);
        assert_eq!(decision.retry_after, WINDOW);
    }

    #[test]
    fn test_from_config() {
        let limiter = SlidingWindowRateLimiter::from(&RateLimitConfig::default());
        assert_eq!(limiter.limit(), 10);
        assert_eq!(limiter.window(), WINDOW);
    }
}
