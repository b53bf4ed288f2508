//! Fixed-window counter state for a single key.

use shared_types::{ServiceError, Timestamp};

/// Request count for one key inside its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    /// Requests admitted in the current window
    pub count: u32,
    /// Absolute expiry (ms since epoch); the window is live while `now < window_end`
    pub window_end: Timestamp,
}

impl RateWindow {
    /// Open a fresh window charged with the current request.
    pub fn open(now: Timestamp, window_ms: u64) -> Self {
        Self {
            count: 1,
            window_end: now.saturating_add(window_ms),
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.window_end
    }

    /// Charge one request against this window.
    ///
    /// An expired window is replaced before counting. A denied request is
    /// not charged.
    pub fn admit(&mut self, now: Timestamp, limit: u32, window_ms: u64) -> Decision {
        if self.is_expired(now) {
            *self = Self::open(now, window_ms);
            return Decision::admitted(limit, limit.saturating_sub(1), self.window_end, now);
        }

        if self.count >= limit {
            return Decision::denied(limit, self.window_end, now);
        }

        self.count += 1;
        Decision::admitted(limit, limit - self.count, self.window_end, now)
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// Configured ceiling for the window
    pub limit: u32,
    /// Requests still admissible in this window
    pub remaining: u32,
    /// When the window resets (ms since epoch)
    pub reset_at: Timestamp,
    /// When the decision was taken (ms since epoch)
    pub decided_at: Timestamp,
}

impl Decision {
    pub fn admitted(limit: u32, remaining: u32, reset_at: Timestamp, now: Timestamp) -> Self {
        Self {
            allowed: true,
            limit,
            remaining,
            reset_at,
            decided_at: now,
        }
    }

    pub fn denied(limit: u32, reset_at: Timestamp, now: Timestamp) -> Self {
        Self {
            allowed: false,
            limit,
            remaining: 0,
            reset_at,
            decided_at: now,
        }
    }

    /// Whole seconds until reset, rounded up, never below 1.
    pub fn retry_after_secs(&self) -> u64 {
        let wait_ms = self.reset_at.saturating_sub(self.decided_at);
        wait_ms.div_ceil(1000).max(1)
    }

    /// Reset time as epoch seconds (for the `X-RateLimit-Reset` header).
    pub fn reset_epoch_secs(&self) -> u64 {
        shared_types::to_epoch_secs(self.reset_at)
    }

    /// Convert a denial into the service-level error.
    pub fn to_error(&self) -> ServiceError {
        ServiceError::RateLimited {
            limit: self.limit,
            reset_at: self.reset_at,
            retry_after_secs: self.retry_after_secs(),
        }
    }
}
