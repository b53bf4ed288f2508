//! Comment entity and validation.

use crate::domain::errors::FeedbackError;
use serde::{Deserialize, Serialize};
use shared_types::{CommentId, FeedbackId, Timestamp, UserId};

pub const MAX_COMMENT_LEN: usize = 10_000;

/// Feedback-scoped comment, optionally threaded under a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub feedback_id: FeedbackId,
    pub author_id: UserId,
    pub parent_id: Option<CommentId>,
    pub body: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Comment {
    pub fn is_author(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub author_id: UserId,
    pub body: String,
    #[serde(default)]
    pub parent_id: Option<CommentId>,
}

pub fn validate_comment_body(body: &str) -> Result<(), FeedbackError> {
    if body.trim().is_empty() {
        return Err(FeedbackError::Validation("comment body is required".into()));
    }
    if body.chars().count() > MAX_COMMENT_LEN {
        return Err(FeedbackError::Validation(format!(
            "comment body exceeds {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(())
}
