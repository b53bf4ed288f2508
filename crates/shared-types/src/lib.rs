//! # Shared Types Crate
//!
//! Cross-subsystem types for the Feedloop core.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers, caller identity and the error
//!   taxonomy are defined once and reused by every subsystem.
//! - **Identity from Context**: subsystems never parse credentials; they receive
//!   a [`CallerIdentity`] resolved by the (external) auth layer.
//! - **Opaque Failures**: [`ServiceError`] carries an HTTP status hint and renders
//!   a public body that never includes infrastructure detail.

pub mod entities;
pub mod errors;
pub mod humantime_serde;
pub mod identity;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use identity::*;
pub use time::*;
