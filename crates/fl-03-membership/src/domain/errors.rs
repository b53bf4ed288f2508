//! Error types for membership.

use crate::ports::outbound::RepositoryError;
use shared_types::{DomainCode, ServiceError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    #[error("user is already a member of this project")]
    AlreadyMember,

    /// Unknown token, or the invite has expired.
    #[error("invite is invalid or expired")]
    InviteInvalid,

    #[error("invite is no longer pending")]
    InviteNotPending,

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("repository failure during {operation}: {source}")]
    Repository {
        operation: &'static str,
        source: RepositoryError,
    },
}

impl MembershipError {
    /// Wrap a repository failure with the operation that hit it.
    pub fn repository(operation: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| match source {
            RepositoryError::DuplicateMember => Self::AlreadyMember,
            RepositoryError::StatusChanged => Self::InviteNotPending,
            RepositoryError::NotFound { resource } => Self::NotFound { resource },
            source => Self::Repository { operation, source },
        }
    }
}

impl From<MembershipError> for ServiceError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::AlreadyMember => {
                ServiceError::domain(DomainCode::AlreadyMember, "user is already a member")
            }
            MembershipError::InviteInvalid => {
                ServiceError::domain(DomainCode::InviteInvalid, "invite is invalid or expired")
            }
            MembershipError::InviteNotPending => {
                ServiceError::domain(DomainCode::InviteNotPending, "invite is no longer pending")
            }
            MembershipError::NotFound { resource } => ServiceError::not_found(resource),
            MembershipError::Validation(message) => {
                ServiceError::domain(DomainCode::Validation, message)
            }
            MembershipError::Repository { operation, source } => {
                ServiceError::internal(operation, source.to_string())
            }
        }
    }
}
