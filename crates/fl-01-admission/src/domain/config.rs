//! Admission configuration with validation.

use serde::{Deserialize, Serialize};
use shared_types::humantime_serde;
use std::time::Duration;

/// Limits for one protected route family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Maximum admitted requests per key per window
    pub limit: u32,
    /// Window length
    #[serde(with = "humantime_serde")]
    pub window: Duration,
    /// How often expired windows are purged
    #[serde(with = "humantime_serde")]
    pub cleanup_interval: Duration,
    /// When false every request is admitted and nothing is tracked
    pub enabled: bool,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            window: Duration::from_secs(60),
            cleanup_interval: Duration::from_secs(60),
            enabled: true,
        }
    }
}

impl AdmissionConfig {
    /// Create an enabled configuration; cleanup runs once per window.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            cleanup_interval: window,
            enabled: true,
        }
    }

    /// Anonymous public endpoints (landing, waitlist, public boards).
    pub fn public() -> Self {
        Self::new(60, Duration::from_secs(60))
    }

    /// Signed-in console traffic.
    pub fn authenticated() -> Self {
        Self::new(300, Duration::from_secs(60))
    }

    /// In-app SDK submissions, keyed per project.
    pub fn sdk() -> Self {
        Self::new(120, Duration::from_secs(60))
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn window_ms(&self) -> u64 {
        self.window.as_millis() as u64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::InvalidLimit("limit cannot be 0".into()));
        }
        if self.window.as_millis() == 0 {
            return Err(ConfigError::InvalidWindow(
                "window must be at least 1ms".into(),
            ));
        }
        if self.cleanup_interval.is_zero() {
            return Err(ConfigError::InvalidCleanupInterval(
                "cleanup_interval cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    #[error("invalid window: {0}")]
    InvalidWindow(String),
    #[error("invalid cleanup interval: {0}")]
    InvalidCleanupInterval(String),
}
