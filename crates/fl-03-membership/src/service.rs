//! Membership Service
//!
//! Implements [`MembershipApi`] and [`RoleResolver`] over the membership and
//! invite repositories.

use async_trait::async_trait;
use shared_types::{
    new_id, CallerIdentity, CallerRole, InviteId, ProjectId, Subject, SystemTimeSource, TeamRole,
    TimeSource, UserId,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{
    generate_invite_token, normalize_email, Invite, InviteStatus, Membership, MembershipConfig,
    MembershipError,
};
use crate::ports::{InviteRepository, MembershipApi, MembershipRepository, RoleResolver};

pub struct MembershipService<M, I, T = SystemTimeSource>
where
    M: MembershipRepository,
    I: InviteRepository,
    T: TimeSource,
{
    members: Arc<M>,
    invites: Arc<I>,
    config: MembershipConfig,
    clock: T,
}

impl<M: MembershipRepository, I: InviteRepository> MembershipService<M, I> {
    pub fn new(members: Arc<M>, invites: Arc<I>, config: MembershipConfig) -> Self {
        Self::with_time_source(members, invites, config, SystemTimeSource)
    }
}

impl<M, I, T> MembershipService<M, I, T>
where
    M: MembershipRepository,
    I: InviteRepository,
    T: TimeSource,
{
    pub fn with_time_source(
        members: Arc<M>,
        invites: Arc<I>,
        config: MembershipConfig,
        clock: T,
    ) -> Self {
        Self {
            members,
            invites,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &MembershipConfig {
        &self.config
    }

    async fn is_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        operation: &'static str,
    ) -> Result<bool, MembershipError> {
        Ok(self
            .members
            .get_membership(project_id, user_id)
            .await
            .map_err(MembershipError::repository(operation))?
            .is_some())
    }
}

#[async_trait]
impl<M, I, T> MembershipApi for MembershipService<M, I, T>
where
    M: MembershipRepository,
    I: InviteRepository,
    T: TimeSource,
{
    async fn add_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        role: TeamRole,
    ) -> Result<Membership, MembershipError> {
        if self.is_member(project_id, user_id, "membership.add").await? {
            return Err(MembershipError::AlreadyMember);
        }

        let membership = self
            .members
            .insert_membership(Membership {
                project_id,
                user_id,
                role,
                joined_at: self.clock.now(),
            })
            .await
            .map_err(MembershipError::repository("membership.add"))?;

        info!(project_id = %project_id, user_id = %user_id, role = %role, "Member added");
        Ok(membership)
    }

    async fn remove_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<(), MembershipError> {
        self.members
            .remove_membership(project_id, user_id)
            .await
            .map_err(MembershipError::repository("membership.remove"))?;
        info!(project_id = %project_id, user_id = %user_id, "Member removed");
        Ok(())
    }

    async fn list_members(&self, project_id: ProjectId) -> Result<Vec<Membership>, MembershipError> {
        self.members
            .list_memberships(project_id)
            .await
            .map_err(MembershipError::repository("membership.list"))
    }

    async fn create_invite(
        &self,
        project_id: ProjectId,
        email: &str,
        role: TeamRole,
        created_by: UserId,
    ) -> Result<Invite, MembershipError> {
        if role == TeamRole::Owner {
            return Err(MembershipError::Validation(
                "ownership cannot be granted by invite".into(),
            ));
        }
        let email = normalize_email(email)?;
        let now = self.clock.now();

        let invite = Invite {
            id: new_id(),
            project_id,
            email,
            role,
            token: generate_invite_token(),
            status: InviteStatus::Pending,
            expires_at: now.saturating_add(self.config.invite_ttl_ms()),
            created_by,
            created_at: now,
        };
        let invite = self
            .invites
            .create_invite(invite)
            .await
            .map_err(MembershipError::repository("invite.create"))?;

        info!(
            invite_id = %invite.id,
            project_id = %project_id,
            role = %role,
            expires_at = invite.expires_at,
            "Invite created"
        );
        Ok(invite)
    }

    async fn accept_invite(
        &self,
        token: &str,
        user_id: UserId,
    ) -> Result<Membership, MembershipError> {
        let invite = self
            .invites
            .find_by_token(token)
            .await
            .map_err(MembershipError::repository("invite.accept"))?
            .ok_or(MembershipError::InviteInvalid)?;

        if !invite.is_pending() {
            debug!(invite_id = %invite.id, status = ?invite.status, "Invite not pending");
            return Err(MembershipError::InviteNotPending);
        }
        let now = self.clock.now();
        if invite.is_expired(now) {
            debug!(invite_id = %invite.id, expires_at = invite.expires_at, "Invite expired");
            return Err(MembershipError::InviteInvalid);
        }
        if self
            .is_member(invite.project_id, user_id, "invite.accept")
            .await?
        {
            return Err(MembershipError::AlreadyMember);
        }

        // Tokens are single use: whoever wins the status swap gets the membership.
        self.invites
            .transition_invite(invite.id, InviteStatus::Pending, InviteStatus::Accepted)
            .await
            .map_err(MembershipError::repository("invite.accept"))?;

        let inserted = self
            .members
            .insert_membership(Membership {
                project_id: invite.project_id,
                user_id,
                role: invite.role,
                joined_at: now,
            })
            .await;
        let membership = match inserted {
            Ok(membership) => membership,
            Err(err) => {
                // Hand the token back so the invitee can retry.
                if let Err(rollback) = self
                    .invites
                    .transition_invite(invite.id, InviteStatus::Accepted, InviteStatus::Pending)
                    .await
                {
                    warn!(
                        invite_id = %invite.id,
                        error = %rollback,
                        "Failed to reopen invite after membership insert failed"
                    );
                }
                return Err(MembershipError::repository("invite.accept")(err));
            }
        };

        info!(
            invite_id = %invite.id,
            project_id = %invite.project_id,
            user_id = %user_id,
            role = %invite.role,
            "Invite accepted"
        );
        Ok(membership)
    }

    async fn revoke_invite(&self, invite_id: InviteId) -> Result<Invite, MembershipError> {
        let invite = self
            .invites
            .get_invite(invite_id)
            .await
            .map_err(MembershipError::repository("invite.revoke"))?
            .ok_or(MembershipError::NotFound { resource: "invite" })?;
        if !invite.is_pending() {
            return Err(MembershipError::InviteNotPending);
        }

        let revoked = self
            .invites
            .transition_invite(invite_id, InviteStatus::Pending, InviteStatus::Revoked)
            .await
            .map_err(MembershipError::repository("invite.revoke"))?;
        info!(invite_id = %invite_id, project_id = %revoked.project_id, "Invite revoked");
        Ok(revoked)
    }
}

#[async_trait]
impl<M, I, T> RoleResolver for MembershipService<M, I, T>
where
    M: MembershipRepository,
    I: InviteRepository,
    T: TimeSource,
{
    async fn resolve(
        &self,
        project_id: ProjectId,
        identity: &CallerIdentity,
    ) -> Result<CallerRole, MembershipError> {
        let user_id = match identity.subject {
            Subject::User(id) => id,
            Subject::Sdk(key_project) => {
                if key_project != project_id {
                    warn!(
                        project_id = %project_id,
                        key_project = %key_project,
                        "SDK key used against another project"
                    );
                }
                return Ok(CallerRole::Community);
            }
            Subject::Anonymous => return Ok(CallerRole::Community),
        };

        let membership = self
            .members
            .get_membership(project_id, user_id)
            .await
            .map_err(MembershipError::repository("role.resolve"))?;
        Ok(membership.map_or(CallerRole::Community, |m| CallerRole::Team(m.role)))
    }
}
