//! Domain types for the Admission Controller.
//!
//! Pure logic only: window arithmetic, key derivation and configuration.
//! Shared state and the tower integration live outside this module.

pub mod config;
pub mod key;
pub mod window;

pub use config::{AdmissionConfig, ConfigError};
pub use key::{derive_key, KeyStrategy, RequestKey};
pub use window::{Decision, RateWindow};
