//! Shared admission state.
//!
//! One [`RateWindow`] per key in a [`DashMap`]. `allow` holds the entry lock
//! for its key only while checking and incrementing; `sweep` uses `retain`,
//! which locks one shard at a time.

use crate::domain::config::AdmissionConfig;
use crate::domain::window::{Decision, RateWindow};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::{SystemTimeSource, TimeSource, Timestamp};
use tracing::debug;

/// Fixed-window admission controller.
pub struct AdmissionController<T: TimeSource = SystemTimeSource> {
    windows: DashMap<String, RateWindow>,
    config: AdmissionConfig,
    clock: T,
}

impl AdmissionController<SystemTimeSource> {
    pub fn new(config: AdmissionConfig) -> Self {
        Self::with_time_source(config, SystemTimeSource)
    }
}

impl<T: TimeSource> AdmissionController<T> {
    pub fn with_time_source(config: AdmissionConfig, clock: T) -> Self {
        Self {
            windows: DashMap::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Decide whether a request for `key` may proceed.
    ///
    /// Never fails. When the controller is disabled every call is admitted
    /// with a full quota and nothing is recorded.
    pub fn allow(&self, key: &str) -> Decision {
        let now = self.clock.now();
        let limit = self.config.limit;
        let window_ms = self.config.window_ms();

        if !self.config.enabled {
            return Decision::admitted(limit, limit, now.saturating_add(window_ms), now);
        }

        match self.windows.entry(key.to_owned()) {
            Entry::Vacant(vacant) => {
                let window = RateWindow::open(now, window_ms);
                debug!(key, window_end = window.window_end, "Opening admission window");
                vacant.insert(window);
                Decision::admitted(limit, limit.saturating_sub(1), window.window_end, now)
            }
            Entry::Occupied(mut occupied) => occupied.get_mut().admit(now, limit, window_ms),
        }
    }

    /// Remove every window that has already ended. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.windows.len();
        self.windows.retain(|_, window| !window.is_expired(now));
        let removed = before.saturating_sub(self.windows.len());
        if removed > 0 {
            debug!(removed, remaining = self.windows.len(), "Swept expired admission windows");
        }
        removed
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    /// Current window for `key`, if any.
    pub fn window(&self, key: &str) -> Option<RateWindow> {
        self.windows.get(key).map(|entry| *entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::ManualTimeSource;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn controller(limit: u32, window_secs: u64) -> AdmissionController<Arc<ManualTimeSource>> {
        let clock = Arc::new(ManualTimeSource::new(0));
        AdmissionController::with_time_source(
            AdmissionConfig::new(limit, Duration::from_secs(window_secs)),
            clock,
        )
    }

    fn clock_of(c: &AdmissionController<Arc<ManualTimeSource>>) -> &ManualTimeSource {
        &c.clock
    }

    #[test]
    fn test_three_per_minute_scenario() {
        let c = controller(3, 60);
        let clock = clock_of(&c);

        let mut remaining = Vec::new();
        for t in 0..3 {
            clock.set(t * 1_000);
            let d = c.allow("ip:10.0.0.1");
            assert!(d.allowed);
            remaining.push(d.remaining);
        }
        assert_eq!(remaining, vec![2, 1, 0]);

        clock.set(3_000);
        let denied = c.allow("ip:10.0.0.1");
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset_at, 60_000);
        assert_eq!(denied.reset_epoch_secs(), 60);
        assert_eq!(denied.retry_after_secs(), 57);

        clock.set(61_000);
        let after = c.allow("ip:10.0.0.1");
        assert!(after.allowed);
        assert_eq!(after.remaining, 2);
    }

    #[test]
    fn test_reset_exactly_at_window_end() {
        let c = controller(1, 60);
        assert!(c.allow("k").allowed);
        clock_of(&c).set(59_999);
        assert!(!c.allow("k").allowed);
        clock_of(&c).set(60_000);
        assert!(c.allow("k").allowed);
    }

    #[test]
    fn test_keys_are_independent() {
        let c = controller(1, 60);
        assert!(c.allow("user:a").allowed);
        assert!(!c.allow("user:a").allowed);
        assert!(c.allow("user:b").allowed);
        assert_eq!(c.tracked_keys(), 2);
    }

    #[test]
    fn test_disabled_admits_without_tracking() {
        let mut config = AdmissionConfig::new(1, Duration::from_secs(60));
        config.enabled = false;
        let c = AdmissionController::with_time_source(config, ManualTimeSource::new(0));

        for _ in 0..50 {
            let d = c.allow("ip:10.0.0.9");
            assert!(d.allowed);
            assert_eq!(d.remaining, 1);
        }
        assert_eq!(c.tracked_keys(), 0);
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let c = controller(5, 60);
        let clock = clock_of(&c);

        c.allow("old");
        clock.set(30_000);
        c.allow("young");
        assert_eq!(c.tracked_keys(), 2);

        clock.set(59_999);
        assert_eq!(c.sweep(), 0);

        clock.set(60_000);
        assert_eq!(c.sweep(), 1);
        assert!(c.window("old").is_none());
        assert!(c.window("young").is_some());

        clock.set(90_000);
        assert_eq!(c.sweep(), 1);
        assert_eq!(c.tracked_keys(), 0);
    }

    #[test]
    fn test_sweep_does_not_change_outcomes() {
        let c = controller(2, 60);
        let clock = clock_of(&c);
        c.allow("k");
        c.allow("k");
        clock.set(70_000);
        c.sweep();
        let d = c.allow("k");
        assert!(d.allowed);
        assert_eq!(d.remaining, 1);
    }

    #[test]
    fn test_concurrent_allow_never_exceeds_limit() {
        let c = controller(50, 60);
        let admitted = AtomicU32::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..25 {
                        if c.allow("shared").allowed {
                            admitted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert_eq!(admitted.load(Ordering::Relaxed), 50);
        assert_eq!(c.window("shared").map(|w| w.count), Some(50));
    }

    proptest! {
        #[test]
        fn prop_limit_calls_count_down_to_zero(limit in 1u32..200) {
            let c = controller(limit, 60);
            let mut previous = u32::MAX;
            for _ in 0..limit {
                let d = c.allow("k");
                prop_assert!(d.allowed);
                prop_assert!(d.remaining < previous);
                previous = d.remaining;
            }
            prop_assert_eq!(previous, 0);

            let over = c.allow("k");
            prop_assert!(!over.allowed);
            prop_assert_eq!(over.remaining, 0);
        }

        #[test]
        fn prop_expiry_restores_full_quota(limit in 1u32..50, extra in 0u32..20, gap_ms in 0u64..120_000) {
            let c = controller(limit, 60);
            for _ in 0..(limit + extra) {
                c.allow("k");
            }
            clock_of(&c).set(60_000 + gap_ms);
            let d = c.allow("k");
            prop_assert!(d.allowed);
            prop_assert_eq!(d.remaining, limit - 1);
        }

        #[test]
        fn prop_sweep_keeps_live_windows(offsets in proptest::collection::vec(0u64..120_000, 1..30), now in 0u64..200_000) {
            let c = controller(10, 60);
            let clock = clock_of(&c);
            for (i, at) in offsets.iter().enumerate() {
                clock.set(*at);
                c.allow(&format!("k{i}"));
            }
            let live_before: Vec<_> = (0..offsets.len())
                .filter_map(|i| c.window(&format!("k{i}")).map(|w| (i, w)))
                .filter(|(_, w)| w.window_end > now)
                .map(|(i, _)| i)
                .collect();

            clock.set(now);
            c.sweep();
            for i in live_before {
                let key = format!("k{i}");
                prop_assert!(c.window(&key).is_some());
            }
        }
    }
}
