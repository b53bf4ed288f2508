//! Service Layer
//!
//! Application services that orchestrate domain logic and reach persistence
//! only through the driven ports.

pub mod comment_service;
pub mod feedback_service;

pub use comment_service::CommentService;
pub use feedback_service::{FeedbackService, MAX_MERGE_HOPS};
