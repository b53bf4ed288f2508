//! Inbound Ports (Driving Ports)

use async_trait::async_trait;
use shared_types::{CallerIdentity, CallerRole, InviteId, ProjectId, TeamRole, UserId};

use crate::domain::{Invite, Membership, MembershipError};

/// Membership and invitation management.
#[async_trait]
pub trait MembershipApi: Send + Sync {
    /// Fails with `AlreadyMember` if the user already belongs to the project.
    async fn add_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        role: TeamRole,
    ) -> Result<Membership, MembershipError>;

    async fn remove_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<(), MembershipError>;

    async fn list_members(&self, project_id: ProjectId) -> Result<Vec<Membership>, MembershipError>;

    /// Create a pending invite with a fresh random token.
    async fn create_invite(
        &self,
        project_id: ProjectId,
        email: &str,
        role: TeamRole,
        created_by: UserId,
    ) -> Result<Invite, MembershipError>;

    /// Redeem `token` for `user_id`.
    ///
    /// # Errors
    /// - `InviteInvalid`: unknown token or expired invite
    /// - `InviteNotPending`: already accepted or revoked
    /// - `AlreadyMember`: the user already belongs to the project
    async fn accept_invite(&self, token: &str, user_id: UserId)
        -> Result<Membership, MembershipError>;

    /// Pending → revoked; anything else fails with `InviteNotPending`.
    async fn revoke_invite(&self, invite_id: InviteId) -> Result<Invite, MembershipError>;
}

/// Turns a request identity into a role for one project.
#[async_trait]
pub trait RoleResolver: Send + Sync {
    async fn resolve(
        &self,
        project_id: ProjectId,
        identity: &CallerIdentity,
    ) -> Result<CallerRole, MembershipError>;
}
