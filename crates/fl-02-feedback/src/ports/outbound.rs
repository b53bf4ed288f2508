//! Outbound Ports (Driven Ports)
//!
//! Persistence the engine depends on. Implementations provide their own
//! concurrency control; the engine holds no mutable state.

use async_trait::async_trait;
use shared_types::{CommentId, FeedbackId, ProjectId, TagId, Timestamp};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::domain::{Comment, Feedback, FeedbackQuery, MergeViolation, Tag, TagDelta};

/// Errors from repository implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// Merge preconditions failed when re-checked atomically with the write.
    #[error("merge rejected: {0}")]
    MergeRejected(MergeViolation),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Feedback persistence (Driven Port)
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn get_by_id(&self, id: FeedbackId) -> Result<Option<Feedback>, RepositoryError>;

    async fn create(&self, feedback: Feedback) -> Result<Feedback, RepositoryError>;

    /// Overwrite the editable columns. `tags` on the argument is ignored.
    ///
    /// `canonical_id`, `vote_count` and `merge_count` are owned by
    /// [`FeedbackRepository::merge`] and keep their stored values, so a
    /// snapshot loaded before a merge cannot undo it.
    async fn update(&self, feedback: &Feedback) -> Result<Feedback, RepositoryError>;

    /// Matching items for one page plus the total match count.
    async fn list(
        &self,
        project_id: ProjectId,
        query: &FeedbackQuery,
    ) -> Result<(Vec<Feedback>, u64), RepositoryError>;

    /// Idempotent.
    async fn add_tag(&self, feedback_id: FeedbackId, tag_id: TagId) -> Result<(), RepositoryError>;

    /// Idempotent.
    async fn remove_tag(&self, feedback_id: FeedbackId, tag_id: TagId)
        -> Result<(), RepositoryError>;

    /// Compare-and-swap merge.
    ///
    /// Must re-run [`crate::domain::check_merge`] and apply
    /// [`crate::domain::apply_merge`] in one atomic step, returning
    /// `MergeRejected` when the state changed since the caller's check.
    /// Returns the updated canonical item.
    async fn merge(
        &self,
        source_id: FeedbackId,
        canonical_id: FeedbackId,
        merged_at: Timestamp,
    ) -> Result<Feedback, RepositoryError>;

    /// Transactional tag reconciliation, when the backend supports it.
    fn tag_transactions(&self) -> Option<&dyn TagTransactions> {
        None
    }
}

/// Optional capability: read the current tag set and apply the delta in one
/// transaction.
#[async_trait]
pub trait TagTransactions: Send + Sync {
    async fn reconcile_tags(
        &self,
        feedback_id: FeedbackId,
        desired: &BTreeSet<TagId>,
    ) -> Result<TagDelta, RepositoryError>;
}

/// Tag lookups (Driven Port)
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn list_by_feedback(&self, feedback_id: FeedbackId) -> Result<Vec<Tag>, RepositoryError>;

    /// Tags of `project_id` among `ids`. Unknown or foreign ids are omitted.
    async fn find_in_project(
        &self,
        project_id: ProjectId,
        ids: &BTreeSet<TagId>,
    ) -> Result<Vec<Tag>, RepositoryError>;
}

/// Comment persistence (Driven Port)
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError>;

    /// Oldest first.
    async fn list_comments(&self, feedback_id: FeedbackId) -> Result<Vec<Comment>, RepositoryError>;

    async fn create_comment(&self, comment: Comment) -> Result<Comment, RepositoryError>;

    async fn update_comment(&self, comment: &Comment) -> Result<Comment, RepositoryError>;

    async fn delete_comment(&self, id: CommentId) -> Result<(), RepositoryError>;
}
