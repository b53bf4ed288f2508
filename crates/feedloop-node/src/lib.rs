//! # Feedloop Node
//!
//! Composition root for the Feedloop core. The binary in `main.rs` loads
//! configuration, initialises logging and runs a [`NodeRuntime`] until
//! Ctrl+C; the library exposes the same pieces for integration tests.
//!
//! - `container/` - configuration and the subsystem container
//! - `runtime` - sweeper lifecycle and graceful shutdown

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod container;
pub mod runtime;

pub use container::{ConfigError, NodeConfig, Policy, SubsystemContainer};
pub use runtime::NodeRuntime;
