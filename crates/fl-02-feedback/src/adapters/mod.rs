//! Adapters Layer
//!
//! In-process implementations of the driven ports, used by the node wiring
//! and by tests.

pub mod memory;

pub use memory::{InMemoryFeedbackStore, TagWrite};
