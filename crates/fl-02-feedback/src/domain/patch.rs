//! Partial updates.
//!
//! Every field is `Option`: `None` leaves the stored value alone. Nullable
//! fields are `Option<Option<T>>` so an explicit JSON `null` (`Some(None)`)
//! clears the value while an absent key (`None`) does not.

use crate::domain::entities::{
    validate_description, validate_title, Feedback, FeedbackStatus, FeedbackType, Severity,
    Visibility,
};
use crate::domain::errors::FeedbackError;
use serde::{Deserialize, Serialize};
use shared_types::{TagId, Timestamp, UserId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_type: Option<FeedbackType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FeedbackStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub severity: Option<Option<Severity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub assignee_id: Option<Option<UserId>>,
    /// Desired full tag set. Absent means tags are not touched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<TagId>>,
}

impl FeedbackPatch {
    pub fn validate(&self) -> Result<(), FeedbackError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    /// True when the patch changes no column (it may still carry tags).
    pub fn is_field_noop(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.feedback_type.is_none()
            && self.status.is_none()
            && self.severity.is_none()
            && self.visibility.is_none()
            && self.assignee_id.is_none()
    }

    /// Apply present fields to `item`. Tags are reconciled separately.
    pub fn apply_to(&self, item: &mut Feedback, now: Timestamp) {
        if let Some(title) = &self.title {
            item.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(feedback_type) = self.feedback_type {
            item.feedback_type = feedback_type;
        }
        if let Some(status) = self.status {
            transition_status(item, status, now);
        }
        if let Some(severity) = self.severity {
            item.severity = severity;
        }
        if let Some(visibility) = self.visibility {
            item.visibility = visibility;
        }
        if let Some(assignee) = self.assignee_id {
            item.assignee_id = assignee;
        }
        if !self.is_field_noop() {
            item.updated_at = now;
        }
    }
}

/// Change status, keeping `resolved_at` set exactly while completed.
fn transition_status(item: &mut Feedback, next: FeedbackStatus, now: Timestamp) {
    let was_completed = item.status == FeedbackStatus::Completed;
    let is_completed = next == FeedbackStatus::Completed;

    if is_completed && !was_completed {
        item.resolved_at = Some(now);
    } else if was_completed && !is_completed {
        item.resolved_at = None;
    }
    item.status = next;
}
