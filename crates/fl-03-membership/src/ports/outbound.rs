//! Outbound Ports (Driven Ports)

use async_trait::async_trait;
use shared_types::{InviteId, ProjectId, UserId};
use thiserror::Error;

use crate::domain::{Invite, InviteStatus, Membership};

/// Errors from repository implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("membership already exists")]
    DuplicateMember,

    /// Compare-and-swap on invite status lost.
    #[error("invite status changed concurrently")]
    StatusChanged,

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn get_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<Option<Membership>, RepositoryError>;

    /// Fails with `DuplicateMember` when (project, user) exists.
    async fn insert_membership(&self, membership: Membership)
        -> Result<Membership, RepositoryError>;

    async fn remove_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<(), RepositoryError>;

    /// Ordered by join time.
    async fn list_memberships(&self, project_id: ProjectId)
        -> Result<Vec<Membership>, RepositoryError>;
}

#[async_trait]
pub trait InviteRepository: Send + Sync {
    async fn create_invite(&self, invite: Invite) -> Result<Invite, RepositoryError>;

    async fn get_invite(&self, id: InviteId) -> Result<Option<Invite>, RepositoryError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<Invite>, RepositoryError>;

    /// Move an invite from `from` to `to` atomically.
    /// Fails with `StatusChanged` when the stored status is not `from`.
    async fn transition_invite(
        &self,
        id: InviteId,
        from: InviteStatus,
        to: InviteStatus,
    ) -> Result<Invite, RepositoryError>;
}
