//! Error types for the Feedback Resolution Engine.

use crate::domain::merge::MergeViolation;
use crate::ports::outbound::RepositoryError;
use shared_types::{DomainCode, FeedbackId, ServiceError};
use thiserror::Error;

/// Errors returned by the feedback and comment services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    /// Absent, or in another project. The two are never distinguished.
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("parent comment is missing or belongs to another feedback")]
    InvalidParent,

    #[error("merge rejected: {0}")]
    MergeRejected(MergeViolation),

    #[error("validation failed: {0}")]
    Validation(String),

    /// A merged item points at something that is itself merged or missing.
    #[error("corrupted merge chain at {feedback_id}")]
    CorruptedMergeChain { feedback_id: FeedbackId },

    #[error("repository failure during {operation}: {source}")]
    Repository {
        operation: &'static str,
        source: RepositoryError,
    },
}

impl FeedbackError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    /// Wrap a repository failure with the operation that hit it.
    pub fn repository(operation: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| match source {
            RepositoryError::NotFound { resource } => Self::NotFound { resource },
            RepositoryError::MergeRejected(violation) => Self::MergeRejected(violation),
            source => Self::Repository { operation, source },
        }
    }
}

impl From<MergeViolation> for FeedbackError {
    fn from(violation: MergeViolation) -> Self {
        Self::MergeRejected(violation)
    }
}

impl From<FeedbackError> for ServiceError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::NotFound { resource } => ServiceError::not_found(resource),
            FeedbackError::Forbidden(reason) => ServiceError::forbidden(reason),
            FeedbackError::InvalidParent => ServiceError::domain(
                DomainCode::InvalidParent,
                "parent comment is missing or belongs to another feedback",
            ),
            FeedbackError::MergeRejected(violation) => {
                ServiceError::domain(violation.code(), violation.to_string())
            }
            FeedbackError::Validation(message) => {
                ServiceError::domain(DomainCode::Validation, message)
            }
            FeedbackError::CorruptedMergeChain { feedback_id } => ServiceError::internal(
                "feedback.resolve",
                format!("corrupted merge chain at {feedback_id}"),
            ),
            FeedbackError::Repository { operation, source } => {
                ServiceError::internal(operation, source.to_string())
            }
        }
    }
}
