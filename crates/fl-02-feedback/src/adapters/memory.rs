//! In-memory feedback store.
//!
//! All tables sit behind one `parking_lot::RwLock`. Merge CAS and
//! transactional tag reconciliation run entirely under the write lock, so
//! they are atomic with respect to every other call. No lock is held across
//! an `.await`.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{CommentId, FeedbackId, ProjectId, TagId, Timestamp};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::domain::{apply_merge, check_merge, Comment, Feedback, FeedbackQuery, Tag, TagDelta};
use crate::ports::outbound::{
    CommentRepository, FeedbackRepository, RepositoryError, TagRepository, TagTransactions,
};

/// A single tag link write, recorded for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagWrite {
    Attach { feedback_id: FeedbackId, tag_id: TagId },
    Detach { feedback_id: FeedbackId, tag_id: TagId },
}

#[derive(Default)]
struct Tables {
    feedback: HashMap<FeedbackId, Feedback>,
    tags: HashMap<TagId, Tag>,
    links: HashMap<FeedbackId, BTreeSet<TagId>>,
    comments: HashMap<CommentId, Comment>,
    tag_writes: Vec<TagWrite>,
}

impl Tables {
    fn attach(&mut self, feedback_id: FeedbackId, tag_id: TagId) {
        if self.links.entry(feedback_id).or_default().insert(tag_id) {
            self.tag_writes.push(TagWrite::Attach {
                feedback_id,
                tag_id,
            });
        }
    }

    fn detach(&mut self, feedback_id: FeedbackId, tag_id: TagId) {
        let removed = self
            .links
            .get_mut(&feedback_id)
            .is_some_and(|set| set.remove(&tag_id));
        if removed {
            self.tag_writes.push(TagWrite::Detach {
                feedback_id,
                tag_id,
            });
        }
    }

    fn require_feedback(&self, id: FeedbackId) -> Result<&Feedback, RepositoryError> {
        self.feedback
            .get(&id)
            .ok_or(RepositoryError::NotFound {
                resource: "feedback",
            })
    }
}

/// In-memory implementation of every feedback-side repository port.
pub struct InMemoryFeedbackStore {
    tables: RwLock<Tables>,
    transactional: bool,
}

impl Default for InMemoryFeedbackStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryFeedbackStore {
    /// Store that offers [`TagTransactions`].
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            transactional: true,
        }
    }

    /// Store without the transactional capability; the engine falls back to
    /// last-writer-wins reconciliation.
    pub fn without_transactions() -> Self {
        Self {
            transactional: false,
            ..Self::new()
        }
    }

    /// Write a feedback row as given, merge columns included.
    pub fn put_feedback(&self, mut feedback: Feedback) {
        feedback.tags.clear();
        self.tables.write().feedback.insert(feedback.id, feedback);
    }

    pub fn insert_tag(&self, tag: Tag) {
        self.tables.write().tags.insert(tag.id, tag);
    }

    /// Every effective attach/detach so far, in order.
    pub fn tag_writes(&self) -> Vec<TagWrite> {
        self.tables.read().tag_writes.clone()
    }

    pub fn clear_tag_writes(&self) {
        self.tables.write().tag_writes.clear();
    }

    pub fn feedback_count(&self) -> usize {
        self.tables.read().feedback.len()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackStore {
    async fn get_by_id(&self, id: FeedbackId) -> Result<Option<Feedback>, RepositoryError> {
        Ok(self.tables.read().feedback.get(&id).cloned())
    }

    async fn create(&self, mut feedback: Feedback) -> Result<Feedback, RepositoryError> {
        feedback.tags.clear();
        let mut tables = self.tables.write();
        if tables.feedback.contains_key(&feedback.id) {
            return Err(RepositoryError::Conflict(format!(
                "feedback {} already exists",
                feedback.id
            )));
        }
        tables.feedback.insert(feedback.id, feedback.clone());
        Ok(feedback)
    }

    async fn update(&self, feedback: &Feedback) -> Result<Feedback, RepositoryError> {
        let mut tables = self.tables.write();
        let current = tables.require_feedback(feedback.id)?;
        let mut stored = feedback.clone();
        stored.tags.clear();
        stored.canonical_id = current.canonical_id;
        stored.vote_count = current.vote_count;
        stored.merge_count = current.merge_count;
        tables.feedback.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list(
        &self,
        project_id: ProjectId,
        query: &FeedbackQuery,
    ) -> Result<(Vec<Feedback>, u64), RepositoryError> {
        let tables = self.tables.read();
        let empty = BTreeSet::new();

        let mut matched: Vec<&Feedback> = tables
            .feedback
            .values()
            .filter(|item| item.project_id == project_id)
            .filter(|item| query.matches(item, tables.links.get(&item.id).unwrap_or(&empty)))
            .collect();
        matched.sort_by(|a, b| query.compare(a, b));

        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(query.pagination.offset() as usize)
            .take(query.pagination.limit() as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn add_tag(&self, feedback_id: FeedbackId, tag_id: TagId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write();
        tables.require_feedback(feedback_id)?;
        tables.attach(feedback_id, tag_id);
        Ok(())
    }

    async fn remove_tag(
        &self,
        feedback_id: FeedbackId,
        tag_id: TagId,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write();
        tables.require_feedback(feedback_id)?;
        tables.detach(feedback_id, tag_id);
        Ok(())
    }

    async fn merge(
        &self,
        source_id: FeedbackId,
        canonical_id: FeedbackId,
        merged_at: Timestamp,
    ) -> Result<Feedback, RepositoryError> {
        let mut tables = self.tables.write();
        let mut source = tables.require_feedback(source_id)?.clone();
        let mut canonical = tables.require_feedback(canonical_id)?.clone();

        check_merge(&source, &canonical).map_err(RepositoryError::MergeRejected)?;
        apply_merge(&mut source, &mut canonical, merged_at);

        tables.feedback.insert(source.id, source);
        tables.feedback.insert(canonical.id, canonical.clone());
        Ok(canonical)
    }

    fn tag_transactions(&self) -> Option<&dyn TagTransactions> {
        if self.transactional {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl TagTransactions for InMemoryFeedbackStore {
    async fn reconcile_tags(
        &self,
        feedback_id: FeedbackId,
        desired: &BTreeSet<TagId>,
    ) -> Result<TagDelta, RepositoryError> {
        let mut tables = self.tables.write();
        tables.require_feedback(feedback_id)?;

        let current = tables.links.get(&feedback_id).cloned().unwrap_or_default();
        let delta = TagDelta::compute(&current, desired);
        for tag_id in &delta.attach {
            tables.attach(feedback_id, *tag_id);
        }
        for tag_id in &delta.detach {
            tables.detach(feedback_id, *tag_id);
        }
        debug!(
            feedback_id = %feedback_id,
            attached = delta.attach.len(),
            detached = delta.detach.len(),
            "Reconciled tags in transaction"
        );
        Ok(delta)
    }
}

#[async_trait]
impl TagRepository for InMemoryFeedbackStore {
    async fn list_by_feedback(&self, feedback_id: FeedbackId) -> Result<Vec<Tag>, RepositoryError> {
        let tables = self.tables.read();
        let mut tags: Vec<Tag> = tables
            .links
            .get(&feedback_id)
            .into_iter()
            .flatten()
            .filter_map(|id| tables.tags.get(id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(tags)
    }

    async fn find_in_project(
        &self,
        project_id: ProjectId,
        ids: &BTreeSet<TagId>,
    ) -> Result<Vec<Tag>, RepositoryError> {
        let tables = self.tables.read();
        Ok(ids
            .iter()
            .filter_map(|id| tables.tags.get(id))
            .filter(|tag| tag.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryFeedbackStore {
    async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError> {
        Ok(self.tables.read().comments.get(&id).cloned())
    }

    async fn list_comments(&self, feedback_id: FeedbackId) -> Result<Vec<Comment>, RepositoryError> {
        let tables = self.tables.read();
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.feedback_id == feedback_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn create_comment(&self, comment: Comment) -> Result<Comment, RepositoryError> {
        let mut tables = self.tables.write();
        tables.require_feedback(comment.feedback_id)?;
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, comment: &Comment) -> Result<Comment, RepositoryError> {
        let mut tables = self.tables.write();
        if !tables.comments.contains_key(&comment.id) {
            return Err(RepositoryError::NotFound {
                resource: "comment",
            });
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound {
                resource: "comment",
            })
    }
}
