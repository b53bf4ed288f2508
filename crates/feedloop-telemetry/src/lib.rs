//! # Feedloop Telemetry
//!
//! Structured logging for Feedloop services via `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use feedloop_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FL_SERVICE_NAME` | `feedloop` | Service name in startup log |
//! | `FL_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `FL_JSON_LOGS` | `false` (`true` in containers) | JSON output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install subscriber: {0}")]
    Init(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
