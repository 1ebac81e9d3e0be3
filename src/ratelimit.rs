//! Rate-limit state for both sides of the pipeline.
//!
//! [`RateLimiter`] is the server's per-fingerprint windowed counter;
//! [`Cooldown`] is the client's single last-submission gate. Both take the
//! current time as an argument so tests can drive the clock.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

struct Entry {
    count: u32,
    expires_at: Instant,
}

/// Windowed submission counter keyed by client fingerprint.
///
/// Each allowed submission increments the key's counter and refreshes its
/// expiry to the full window length; once the counter reaches the ceiling,
/// further submissions are rejected until the entry expires. Check and
/// increment happen under one lock, so concurrent requests from the same
/// fingerprint cannot under-count.
pub struct RateLimiter {
    max_submissions: u32,
    window: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl RateLimiter {
    pub fn new(max_submissions: u32, window: Duration) -> Self {
        Self {
            max_submissions,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns whether a submission under `key` is allowed at `now`, and
    /// records it if so. A rejected submission does not refresh the window.
    pub fn check_and_record(&self, key: &str, now: Instant) -> bool {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        entries.retain(|_, entry| now < entry.expires_at);

        match entries.get_mut(key) {
            Some(entry) => {
                if entry.count >= self.max_submissions {
                    return false;
                }
                entry.count += 1;
                entry.expires_at = now + self.window;
                true
            }
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        count: 1,
                        expires_at: now + self.window,
                    },
                );
                true
            }
        }
    }
}

/// Minimum spacing between submissions from one client instance.
///
/// The timestamp is only advanced after a confirmed success, so a failed
/// attempt does not cost the user their next slot.
pub struct Cooldown {
    period: Duration,
    last_success: Mutex<Option<Instant>>,
}

impl Cooldown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_success: Mutex::new(None),
        }
    }

    /// Time left until the next submission is allowed, or `None` if clear.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let last = self
            .last_success
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let last = (*last)?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.period {
            Some(self.period - elapsed)
        } else {
            None
        }
    }

    /// Record a confirmed successful submission at `now`.
    pub fn mark(&self, now: Instant) {
        *self
            .last_success
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_allows_up_to_ceiling() {
        let limiter = RateLimiter::new(3, Duration::from_secs(3600));
        let now = Instant::now();

        assert!(limiter.check_and_record("key", now));
        assert!(limiter.check_and_record("key", now));
        assert!(limiter.check_and_record("key", now));
        assert!(!limiter.check_and_record("key", now));
    }

    #[test]
    fn test_limiter_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(3600));
        let now = Instant::now();

        assert!(limiter.check_and_record("a", now));
        assert!(!limiter.check_and_record("a", now));
        assert!(limiter.check_and_record("b", now));
    }

    #[test]
    fn test_limiter_window_expiry_resets_count() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_and_record("key", start));
        assert!(!limiter.check_and_record("key", start + Duration::from_secs(30)));
        assert!(limiter.check_and_record("key", start + Duration::from_secs(61)));
    }

    #[test]
    fn test_limiter_refreshes_ttl_on_each_record() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_and_record("key", start));
        // Second submission at t+45 pushes expiry to t+105, so the count is
        // still held against the key at t+70.
        assert!(limiter.check_and_record("key", start + Duration::from_secs(45)));
        assert!(limiter.check_and_record("key", start + Duration::from_secs(70)));
        assert!(!limiter.check_and_record("key", start + Duration::from_secs(80)));
    }

    #[test]
    fn test_rejection_does_not_refresh_window() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_and_record("key", start));
        assert!(!limiter.check_and_record("key", start + Duration::from_secs(59)));
        // The rejected attempt must not have extended the entry's life.
        assert!(limiter.check_and_record("key", start + Duration::from_secs(61)));
    }

    #[test]
    fn test_cooldown_counts_down_and_clears() {
        let cooldown = Cooldown::new(Duration::from_secs(30));
        let start = Instant::now();

        assert!(cooldown.remaining(start).is_none());
        cooldown.mark(start);

        let remaining = cooldown
            .remaining(start + Duration::from_secs(10))
            .expect("still cooling down");
        assert_eq!(remaining, Duration::from_secs(20));

        assert!(cooldown.remaining(start + Duration::from_secs(30)).is_none());
    }
}
