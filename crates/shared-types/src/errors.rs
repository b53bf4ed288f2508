//! # Error Types
//!
//! The error taxonomy every subsystem maps into before a result leaves the
//! core. Handlers translate [`ServiceError::status_hint`] into a transport
//! status and render [`ServiceError::to_body`] as the response payload.

use crate::entities::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable, machine-readable codes for business-rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainCode {
    /// Comment reply points at a missing parent or one on another feedback.
    InvalidParent,
    /// Merge source and canonical belong to different projects.
    CrossProjectMerge,
    /// Merge target is itself merged into something else.
    MergedCanonical,
    /// Merge source is already merged.
    AlreadyMerged,
    /// Merge source and target are the same item.
    InvalidMergeTarget,
    /// User already belongs to the project.
    AlreadyMember,
    /// Invite token unknown or expired.
    InviteInvalid,
    /// Invite was already accepted or revoked.
    InviteNotPending,
    /// Input failed field validation.
    Validation,
}

impl DomainCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainCode::InvalidParent => "INVALID_PARENT",
            DomainCode::CrossProjectMerge => "CROSS_PROJECT_MERGE",
            DomainCode::MergedCanonical => "MERGED_CANONICAL",
            DomainCode::AlreadyMerged => "ALREADY_MERGED",
            DomainCode::InvalidMergeTarget => "INVALID_MERGE_TARGET",
            DomainCode::AlreadyMember => "ALREADY_MEMBER",
            DomainCode::InviteInvalid => "INVITE_INVALID",
            DomainCode::InviteNotPending => "INVITE_NOT_PENDING",
            DomainCode::Validation => "VALIDATION",
        }
    }

    /// Every domain code is a client error.
    pub fn status_hint(&self) -> u16 {
        400
    }
}

impl fmt::Display for DomainCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the core to the handler layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Missing, or present but not disclosable to this caller.
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// Visibility or ownership rule failed.
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    /// Named business-rule violation.
    #[error("{code}: {message}")]
    Domain { code: DomainCode, message: String },

    /// Admission denied; retry after the window resets.
    #[error("rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimited {
        limit: u32,
        reset_at: Timestamp,
        retry_after_secs: u64,
    },

    /// Repository or infrastructure failure.
    #[error("internal error during {operation}: {message}")]
    Internal {
        operation: &'static str,
        message: String,
    },
}

impl ServiceError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn domain(code: DomainCode, message: impl Into<String>) -> Self {
        Self::Domain {
            code,
            message: message.into(),
        }
    }

    pub fn internal(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Internal {
            operation,
            message: message.into(),
        }
    }

    /// HTTP-class status for the handler layer.
    pub fn status_hint(&self) -> u16 {
        match self {
            ServiceError::NotFound { .. } => 404,
            ServiceError::Forbidden { .. } => 403,
            ServiceError::Domain { code, .. } => code.status_hint(),
            ServiceError::RateLimited { .. } => 429,
            ServiceError::Internal { .. } => 500,
        }
    }

    /// Machine-readable code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound { .. } => "NOT_FOUND",
            ServiceError::Forbidden { .. } => "FORBIDDEN",
            ServiceError::Domain { code, .. } => code.as_str(),
            ServiceError::RateLimited { .. } => "RATE_LIMITED",
            ServiceError::Internal { .. } => "INTERNAL",
        }
    }

    /// Public response body. Internal errors never expose their message.
    pub fn to_body(&self) -> ErrorBody {
        let message = match self {
            ServiceError::Internal { .. } => "internal server error".to_string(),
            other => other.to_string(),
        };
        ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
            },
        }
    }
}

/// Serialized error payload: `{"error":{"code":..,"message":..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
