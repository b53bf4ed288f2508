//! FL-01 Admission Controller - per-key request admission for the API layer.
//!
//! Every inbound request is keyed (client IP, signed-in user, or SDK project)
//! and counted inside a fixed time window. Once a key has used its quota the
//! request is refused until the window resets.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                      ADMISSION CONTROLLER (fl-01)                     │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │   Request ──► AdmissionLayer ──► derive RequestKey ──► allow(key)     │
//! │                    │                                     │            │
//! │                    │                  ┌──────────────────┴─────────┐  │
//! │                    │                  │ DashMap<String, RateWindow>│  │
//! │                    │                  └──────────────────┬─────────┘  │
//! │                    ▼                                     │            │
//! │   X-RateLimit-* headers / 429 + Retry-After       Sweeper task        │
//! │                                              (purges expired windows) │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Algorithm
//!
//! Fixed-window counter. A burst straddling a window boundary can admit up to
//! `2 × limit` requests in a short span; this is accepted behaviour.
//!
//! # Usage
//!
//! ```ignore
//! use fl_01_admission::{AdmissionConfig, AdmissionController, AdmissionLayer, KeyStrategy};
//!
//! let controller = Arc::new(AdmissionController::new(AdmissionConfig::default()));
//! let sweeper = spawn_sweeper(Arc::clone(&controller), config.cleanup_interval);
//! let app = router.layer(AdmissionLayer::new(controller, KeyStrategy::Identity));
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod controller;
pub mod domain;
pub mod middleware;
pub mod sweeper;

pub use controller::AdmissionController;
pub use domain::config::{AdmissionConfig, ConfigError};
pub use domain::key::{derive_key, KeyStrategy, RequestKey};
pub use domain::window::{Decision, RateWindow};
pub use middleware::{AdmissionLayer, AdmissionService};
pub use sweeper::{spawn_sweeper, SweeperHandle};
