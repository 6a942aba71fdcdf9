//! Retry policy for queue resolution
//!
//! Trackers fill their import queue asynchronously after a download
//! finishes, so a lookup that misses is retried on a fixed interval up to a
//! fixed number of attempts. The policy is a plain value; the resolver owns
//! the loop and sleeps on the tokio clock, which tests pause.

use std::time::Duration;

/// Fixed-interval, fixed-cap retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total lookups before giving up
    pub max_attempts: u32,
    /// Pause after every failed lookup
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    pub const fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Whether another lookup is allowed after `failed` misses
    pub fn allows_attempt(&self, failed: u32) -> bool {
        failed < self.max_attempts
    }

    /// Pause after the given failed attempt (1-based); `None` past the cap
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        (attempt >= 1 && attempt <= self.max_attempts).then_some(self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.interval, Duration::from_secs(3));
        let total: Duration = (1..=policy.max_attempts).filter_map(|a| policy.delay_after(a)).sum();
        assert_eq!(total, Duration::from_secs(30));
    }

    #[test]
    fn test_attempt_cap() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(10));
        assert!(policy.allows_attempt(0));
        assert!(policy.allows_attempt(2));
        assert!(!policy.allows_attempt(3));
        assert_eq!(policy.delay_after(3), Some(Duration::from_millis(10)));
        assert_eq!(policy.delay_after(4), None);
        assert_eq!(policy.delay_after(0), None);
    }
}
