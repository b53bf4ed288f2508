//! Ports Layer
//!
//! - Driving Ports (inbound) - API for the handler layer
//! - Driven Ports (outbound) - persistence the engine depends on

pub mod inbound;
pub mod outbound;

pub use inbound::{CommentApi, FeedbackApi};
pub use outbound::{
    CommentRepository, FeedbackRepository, RepositoryError, TagRepository, TagTransactions,
};
