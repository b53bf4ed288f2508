//! Inbound Ports (Driving Ports)
//!
//! Called by the (external) HTTP handlers once a request has been admitted
//! and the caller's role resolved.

use async_trait::async_trait;
use shared_types::{CallerRole, CommentId, FeedbackId, ProjectId, UserId};

use crate::domain::{
    Comment, Feedback, FeedbackError, FeedbackFilter, FeedbackPage, FeedbackPatch, NewComment,
    NewFeedback,
};

/// Feedback read/write API.
#[async_trait]
pub trait FeedbackApi: Send + Sync {
    /// Resolve one item for `role`, following a merge redirect.
    ///
    /// # Errors
    /// - `NotFound`: absent, or belongs to another project
    /// - `Forbidden`: TEAM_ONLY item and `role` is not a team role
    /// - `CorruptedMergeChain`: redirect target missing or itself merged
    async fn get(
        &self,
        project_id: ProjectId,
        feedback_id: FeedbackId,
        role: CallerRole,
    ) -> Result<Feedback, FeedbackError>;

    /// One page of non-merged items visible to `role`.
    async fn list(
        &self,
        project_id: ProjectId,
        filter: &FeedbackFilter,
        role: CallerRole,
    ) -> Result<FeedbackPage, FeedbackError>;

    /// Store a new item. SDK submissions have no author.
    async fn submit(
        &self,
        project_id: ProjectId,
        new: NewFeedback,
        author_id: Option<UserId>,
    ) -> Result<Feedback, FeedbackError>;

    /// Apply a partial update and, when `tag_ids` is present, reconcile tags.
    async fn update(
        &self,
        feedback_id: FeedbackId,
        patch: FeedbackPatch,
        actor_id: UserId,
    ) -> Result<Feedback, FeedbackError>;

    /// Merge `source_id` into `canonical_id` and return the resolved canonical.
    async fn merge(
        &self,
        source_id: FeedbackId,
        canonical_id: FeedbackId,
        actor_id: UserId,
    ) -> Result<Feedback, FeedbackError>;
}

/// Comment API. Reads and writes go through the feedback visibility rules.
#[async_trait]
pub trait CommentApi: Send + Sync {
    /// Comments of the resolved feedback item, oldest first.
    async fn list(
        &self,
        project_id: ProjectId,
        feedback_id: FeedbackId,
        role: CallerRole,
    ) -> Result<Vec<Comment>, FeedbackError>;

    async fn add(
        &self,
        project_id: ProjectId,
        feedback_id: FeedbackId,
        role: CallerRole,
        new: NewComment,
    ) -> Result<Comment, FeedbackError>;

    /// Author only.
    async fn edit(
        &self,
        comment_id: CommentId,
        actor_id: UserId,
        body: String,
    ) -> Result<Comment, FeedbackError>;

    /// Author only.
    async fn delete(&self, comment_id: CommentId, actor_id: UserId) -> Result<(), FeedbackError>;
}
