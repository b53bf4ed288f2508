//! # Container
//!
//! Node configuration and the subsystem container built from it.

pub mod config;
pub mod subsystems;

pub use config::{AdmissionPolicies, ConfigError, NodeConfig};
pub use subsystems::{
    CommentEngine, FeedbackEngine, MembershipEngine, Policy, SubsystemContainer,
};
