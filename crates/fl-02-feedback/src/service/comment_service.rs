//! Comment Service
//!
//! Comments are reached through their feedback item, so visibility and merge
//! redirects apply exactly as for [`FeedbackApi::get`]. Edits and deletes are
//! author-only.

use async_trait::async_trait;
use shared_types::{
    new_id, CallerRole, CommentId, FeedbackId, ProjectId, SystemTimeSource, TimeSource, UserId,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{validate_comment_body, Comment, FeedbackError, NewComment};
use crate::ports::{CommentApi, CommentRepository, FeedbackApi};

pub struct CommentService<A, C, T = SystemTimeSource>
where
    A: FeedbackApi,
    C: CommentRepository,
    T: TimeSource,
{
    feedback: Arc<A>,
    comments: Arc<C>,
    clock: T,
}

impl<A: FeedbackApi, C: CommentRepository> CommentService<A, C> {
    pub fn new(feedback: Arc<A>, comments: Arc<C>) -> Self {
        Self::with_time_source(feedback, comments, SystemTimeSource)
    }
}

impl<A, C, T> CommentService<A, C, T>
where
    A: FeedbackApi,
    C: CommentRepository,
    T: TimeSource,
{
    pub fn with_time_source(feedback: Arc<A>, comments: Arc<C>, clock: T) -> Self {
        Self {
            feedback,
            comments,
            clock,
        }
    }

    /// Load a comment the actor is allowed to modify.
    async fn owned_comment(
        &self,
        comment_id: CommentId,
        actor_id: UserId,
        operation: &'static str,
    ) -> Result<Comment, FeedbackError> {
        let comment = self
            .comments
            .get_comment(comment_id)
            .await
            .map_err(FeedbackError::repository(operation))?
            .ok_or(FeedbackError::not_found("comment"))?;

        if !comment.is_author(actor_id) {
            warn!(
                comment_id = %comment_id,
                actor_id = %actor_id,
                operation,
                "Non-author tried to modify comment"
            );
            return Err(FeedbackError::Forbidden(
                "only the author may modify this comment".into(),
            ));
        }
        Ok(comment)
    }
}

#[async_trait]
impl<A, C, T> CommentApi for CommentService<A, C, T>
where
    A: FeedbackApi + 'static,
    C: CommentRepository + 'static,
    T: TimeSource + 'static,
{
    async fn list(
        &self,
        project_id: ProjectId,
        feedback_id: FeedbackId,
        role: CallerRole,
    ) -> Result<Vec<Comment>, FeedbackError> {
        let item = self.feedback.get(project_id, feedback_id, role).await?;
        self.comments
            .list_comments(item.id)
            .await
            .map_err(FeedbackError::repository("comment.list"))
    }

    async fn add(
        &self,
        project_id: ProjectId,
        feedback_id: FeedbackId,
        role: CallerRole,
        new: NewComment,
    ) -> Result<Comment, FeedbackError> {
        validate_comment_body(&new.body)?;
        let item = self.feedback.get(project_id, feedback_id, role).await?;

        if let Some(parent_id) = new.parent_id {
            let parent = self
                .comments
                .get_comment(parent_id)
                .await
                .map_err(FeedbackError::repository("comment.add"))?;
            match parent {
                Some(parent) if parent.feedback_id == item.id => {}
                _ => return Err(FeedbackError::InvalidParent),
            }
        }

        let now = self.clock.now();
        let comment = Comment {
            id: new_id(),
            feedback_id: item.id,
            author_id: new.author_id,
            parent_id: new.parent_id,
            body: new.body,
            created_at: now,
            updated_at: now,
        };
        let stored = self
            .comments
            .create_comment(comment)
            .await
            .map_err(FeedbackError::repository("comment.add"))?;

        info!(
            comment_id = %stored.id,
            feedback_id = %stored.feedback_id,
            reply = stored.parent_id.is_some(),
            "Comment added"
        );
        Ok(stored)
    }

    async fn edit(
        &self,
        comment_id: CommentId,
        actor_id: UserId,
        body: String,
    ) -> Result<Comment, FeedbackError> {
        validate_comment_body(&body)?;
        let mut comment = self.owned_comment(comment_id, actor_id, "comment.edit").await?;
        comment.body = body;
        comment.updated_at = self.clock.now();
        self.comments
            .update_comment(&comment)
            .await
            .map_err(FeedbackError::repository("comment.edit"))
    }

    async fn delete(&self, comment_id: CommentId, actor_id: UserId) -> Result<(), FeedbackError> {
        self.owned_comment(comment_id, actor_id, "comment.delete")
            .await?;
        self.comments
            .delete_comment(comment_id)
            .await
            .map_err(FeedbackError::repository("comment.delete"))?;
        info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }
}
