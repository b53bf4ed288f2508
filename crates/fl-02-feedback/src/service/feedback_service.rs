//! Feedback Service
//!
//! Implements [`FeedbackApi`] over the feedback and tag repositories.

use async_trait::async_trait;
use shared_types::{
    new_id, CallerRole, FeedbackId, ProjectId, SystemTimeSource, TagId, TimeSource, UserId,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::{
    can_view, check_merge, Feedback, FeedbackError, FeedbackFilter, FeedbackPage, FeedbackPatch,
    FeedbackQuery, NewFeedback, TagDelta,
};
use crate::ports::{FeedbackApi, FeedbackRepository, TagRepository};

/// Redirects followed before a chain is declared corrupt. Canonical items are
/// never merged themselves, so a healthy chain is at most one hop.
pub const MAX_MERGE_HOPS: usize = 1;

/// Feedback Resolution Engine
pub struct FeedbackService<F, G, T = SystemTimeSource>
where
    F: FeedbackRepository,
    G: TagRepository,
    T: TimeSource,
{
    feedback: Arc<F>,
    tags: Arc<G>,
    clock: T,
}

impl<F: FeedbackRepository, G: TagRepository> FeedbackService<F, G> {
    pub fn new(feedback: Arc<F>, tags: Arc<G>) -> Self {
        Self::with_time_source(feedback, tags, SystemTimeSource)
    }
}

impl<F, G, T> FeedbackService<F, G, T>
where
    F: FeedbackRepository,
    G: TagRepository,
    T: TimeSource,
{
    pub fn with_time_source(feedback: Arc<F>, tags: Arc<G>, clock: T) -> Self {
        Self {
            feedback,
            tags,
            clock,
        }
    }

    async fn load(
        &self,
        id: FeedbackId,
        operation: &'static str,
    ) -> Result<Feedback, FeedbackError> {
        self.feedback
            .get_by_id(id)
            .await
            .map_err(FeedbackError::repository(operation))?
            .ok_or(FeedbackError::not_found("feedback"))
    }

    async fn with_tags(
        &self,
        mut item: Feedback,
        operation: &'static str,
    ) -> Result<Feedback, FeedbackError> {
        item.tags = self
            .tags
            .list_by_feedback(item.id)
            .await
            .map_err(FeedbackError::repository(operation))?;
        Ok(item)
    }

    /// Load `feedback_id` and follow its merge redirect with a bounded loop.
    ///
    /// Visibility is judged on the item finally returned, so a merged item
    /// is governed by its canonical's visibility.
    async fn resolve(
        &self,
        project_id: ProjectId,
        feedback_id: FeedbackId,
        role: CallerRole,
    ) -> Result<Feedback, FeedbackError> {
        let mut current = self.load(feedback_id, "feedback.get").await?;
        if current.project_id != project_id {
            return Err(FeedbackError::not_found("feedback"));
        }

        let mut hops = 0;
        while let Some(canonical_id) = current.canonical_id {
            if hops == MAX_MERGE_HOPS {
                error!(
                    feedback_id = %feedback_id,
                    at = %current.id,
                    "Merge chain exceeds one hop"
                );
                return Err(FeedbackError::CorruptedMergeChain {
                    feedback_id: current.id,
                });
            }
            hops += 1;

            debug!(from = %current.id, to = %canonical_id, "Following merge redirect");
            let next = self
                .feedback
                .get_by_id(canonical_id)
                .await
                .map_err(FeedbackError::repository("feedback.get"))?;
            current = match next {
                Some(canonical) => canonical,
                None => {
                    error!(
                        feedback_id = %current.id,
                        canonical_id = %canonical_id,
                        "Merge redirect points at a missing item"
                    );
                    return Err(FeedbackError::CorruptedMergeChain {
                        feedback_id: current.id,
                    });
                }
            };
            if current.project_id != project_id {
                return Err(FeedbackError::not_found("feedback"));
            }
        }

        if !can_view(role, current.visibility) {
            return Err(FeedbackError::Forbidden(
                "feedback is visible to the team only".into(),
            ));
        }
        Ok(current)
    }

    /// Reject tag ids that are unknown or belong to another project.
    async fn ensure_tags_exist(
        &self,
        project_id: ProjectId,
        desired: &BTreeSet<TagId>,
    ) -> Result<(), FeedbackError> {
        if desired.is_empty() {
            return Ok(());
        }
        let found = self
            .tags
            .find_in_project(project_id, desired)
            .await
            .map_err(FeedbackError::repository("feedback.update"))?;
        if found.len() != desired.len() {
            return Err(FeedbackError::not_found("tag"));
        }
        Ok(())
    }

    /// Move the item's tag set to `desired`.
    ///
    /// Uses the repository's transaction when offered. Otherwise reads one
    /// snapshot and issues individual writes (last writer wins).
    async fn reconcile_tags(
        &self,
        feedback_id: FeedbackId,
        desired: &BTreeSet<TagId>,
    ) -> Result<TagDelta, FeedbackError> {
        if let Some(tx) = self.feedback.tag_transactions() {
            return tx
                .reconcile_tags(feedback_id, desired)
                .await
                .map_err(FeedbackError::repository("feedback.reconcile_tags"));
        }

        let current: BTreeSet<TagId> = self
            .tags
            .list_by_feedback(feedback_id)
            .await
            .map_err(FeedbackError::repository("feedback.reconcile_tags"))?
            .into_iter()
            .map(|tag| tag.id)
            .collect();
        let delta = TagDelta::compute(&current, desired);

        for tag_id in &delta.attach {
            self.feedback
                .add_tag(feedback_id, *tag_id)
                .await
                .map_err(FeedbackError::repository("feedback.add_tag"))?;
        }
        for tag_id in &delta.detach {
            self.feedback
                .remove_tag(feedback_id, *tag_id)
                .await
                .map_err(FeedbackError::repository("feedback.remove_tag"))?;
        }
        Ok(delta)
    }
}

#[async_trait]
impl<F, G, T> FeedbackApi for FeedbackService<F, G, T>
where
    F: FeedbackRepository + 'static,
    G: TagRepository + 'static,
    T: TimeSource + 'static,
{
    async fn get(
        &self,
        project_id: ProjectId,
        feedback_id: FeedbackId,
        role: CallerRole,
    ) -> Result<Feedback, FeedbackError> {
        let item = self.resolve(project_id, feedback_id, role).await?;
        self.with_tags(item, "feedback.get").await
    }

    async fn list(
        &self,
        project_id: ProjectId,
        filter: &FeedbackFilter,
        role: CallerRole,
    ) -> Result<FeedbackPage, FeedbackError> {
        let query = FeedbackQuery::for_caller(filter, role);
        let (items, total) = self
            .feedback
            .list(project_id, &query)
            .await
            .map_err(FeedbackError::repository("feedback.list"))?;

        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            resolved.push(self.with_tags(item, "feedback.list").await?);
        }

        debug!(
            project_id = %project_id,
            role = %role,
            total,
            page = query.pagination.page,
            "Listed feedback"
        );
        Ok(FeedbackPage::new(resolved, total, query.pagination))
    }

    async fn submit(
        &self,
        project_id: ProjectId,
        new: NewFeedback,
        author_id: Option<UserId>,
    ) -> Result<Feedback, FeedbackError> {
        new.validate()?;
        let item = new.into_feedback(new_id(), project_id, author_id, self.clock.now());
        let stored = self
            .feedback
            .create(item)
            .await
            .map_err(FeedbackError::repository("feedback.submit"))?;

        info!(
            feedback_id = %stored.id,
            project_id = %project_id,
            feedback_type = ?stored.feedback_type,
            "Feedback submitted"
        );
        Ok(stored)
    }

    async fn update(
        &self,
        feedback_id: FeedbackId,
        patch: FeedbackPatch,
        actor_id: UserId,
    ) -> Result<Feedback, FeedbackError> {
        patch.validate()?;
        let mut item = self.load(feedback_id, "feedback.update").await?;

        let desired: Option<BTreeSet<TagId>> = patch
            .tag_ids
            .as_ref()
            .map(|ids| ids.iter().copied().collect());
        if let Some(desired) = &desired {
            self.ensure_tags_exist(item.project_id, desired).await?;
        }

        if !patch.is_field_noop() {
            patch.apply_to(&mut item, self.clock.now());
            item = self
                .feedback
                .update(&item)
                .await
                .map_err(FeedbackError::repository("feedback.update"))?;
        }

        if let Some(desired) = &desired {
            let delta = self.reconcile_tags(feedback_id, desired).await?;
            debug!(
                feedback_id = %feedback_id,
                attached = delta.attach.len(),
                detached = delta.detach.len(),
                "Tags reconciled"
            );
        }

        info!(
            feedback_id = %feedback_id,
            actor_id = %actor_id,
            status = ?item.status,
            "Feedback updated"
        );
        self.with_tags(item, "feedback.update").await
    }

    async fn merge(
        &self,
        source_id: FeedbackId,
        canonical_id: FeedbackId,
        actor_id: UserId,
    ) -> Result<Feedback, FeedbackError> {
        let source = self.load(source_id, "feedback.merge").await?;
        let canonical = self.load(canonical_id, "feedback.merge").await?;

        if let Err(violation) = check_merge(&source, &canonical) {
            warn!(
                source_id = %source_id,
                canonical_id = %canonical_id,
                code = %violation.code(),
                "Merge rejected"
            );
            return Err(violation.into());
        }

        let merged = self
            .feedback
            .merge(source_id, canonical_id, self.clock.now())
            .await
            .map_err(FeedbackError::repository("feedback.merge"))?;

        info!(
            source_id = %source_id,
            canonical_id = %canonical_id,
            actor_id = %actor_id,
            merge_count = merged.merge_count,
            "Feedback merged"
        );
        self.with_tags(merged, "feedback.merge").await
    }
}
