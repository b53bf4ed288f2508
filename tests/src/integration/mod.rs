//! # Integration Tests
//!
//! Flows that cross subsystem boundaries, wired the way `feedloop-node`
//! wires them.

pub mod access;
pub mod admission;
