//! Feedback entities.

use crate::domain::errors::FeedbackError;
use serde::{Deserialize, Serialize};
use shared_types::{FeedbackId, ProjectId, TagId, Timestamp, UserId};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    Bug,
    Feature,
    #[default]
    General,
}

/// Lifecycle: new → under_review → planned → in_progress → completed | declined | duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    #[default]
    New,
    UnderReview,
    Planned,
    InProgress,
    Completed,
    Declined,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    TeamOnly,
    Community,
}

/// Project-scoped label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub project_id: ProjectId,
    pub name: String,
    pub color: Option<String>,
}

/// Merge status of one item, derived from its own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    Standalone,
    /// Redirects to the given canonical item.
    Merged(FeedbackId),
    /// Has absorbed at least one source.
    Canonical,
}

/// One reported item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub project_id: ProjectId,
    pub author_id: Option<UserId>,
    /// Set once this item has been merged into another.
    pub canonical_id: Option<FeedbackId>,
    pub title: String,
    pub description: String,
    pub feedback_type: FeedbackType,
    pub status: FeedbackStatus,
    pub severity: Option<Severity>,
    pub visibility: Visibility,
    pub assignee_id: Option<UserId>,
    /// Set exactly while status is `completed`.
    pub resolved_at: Option<Timestamp>,
    /// Attached on read; never persisted with the row.
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub vote_count: u32,
    /// Number of sources merged into this item.
    pub merge_count: u32,
    /// Opaque client metadata (device, app version, ...).
    #[serde(default)]
    pub source: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Feedback {
    pub fn merge_state(&self) -> MergeState {
        match self.canonical_id {
            Some(target) => MergeState::Merged(target),
            None if self.merge_count > 0 => MergeState::Canonical,
            None => MergeState::Standalone,
        }
    }

    pub fn is_merged(&self) -> bool {
        self.canonical_id.is_some()
    }

    pub fn tag_ids(&self) -> Vec<TagId> {
        self.tags.iter().map(|t| t.id).collect()
    }
}

/// Submission payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewFeedback {
    pub title: String,
    pub description: String,
    pub feedback_type: FeedbackType,
    pub severity: Option<Severity>,
    pub visibility: Option<Visibility>,
    pub source: serde_json::Value,
}

impl NewFeedback {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), FeedbackError> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }

    /// Build the stored entity.
    pub fn into_feedback(
        self,
        id: FeedbackId,
        project_id: ProjectId,
        author_id: Option<UserId>,
        now: Timestamp,
    ) -> Feedback {
        Feedback {
            id,
            project_id,
            author_id,
            canonical_id: None,
            title: self.title.trim().to_string(),
            description: self.description,
            feedback_type: self.feedback_type,
            status: FeedbackStatus::New,
            severity: self.severity,
            visibility: self.visibility.unwrap_or_default(),
            assignee_id: None,
            resolved_at: None,
            tags: Vec::new(),
            vote_count: 0,
            merge_count: 0,
            source: self.source,
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn validate_title(title: &str) -> Result<(), FeedbackError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(FeedbackError::Validation("title is required".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(FeedbackError::Validation(format!(
            "title exceeds {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), FeedbackError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(FeedbackError::Validation(format!(
            "description exceeds {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}
