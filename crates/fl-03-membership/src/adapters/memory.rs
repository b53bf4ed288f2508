//! In-memory membership and invite store behind one `parking_lot::RwLock`.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{InviteId, ProjectId, UserId};
use std::collections::HashMap;

use crate::domain::{Invite, InviteStatus, Membership};
use crate::ports::outbound::{InviteRepository, MembershipRepository, RepositoryError};

#[derive(Default)]
struct Tables {
    members: HashMap<(ProjectId, UserId), Membership>,
    invites: HashMap<InviteId, Invite>,
}

#[derive(Default)]
pub struct InMemoryMembershipStore {
    tables: RwLock<Tables>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipStore {
    async fn get_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<Option<Membership>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .members
            .get(&(project_id, user_id))
            .cloned())
    }

    async fn insert_membership(
        &self,
        membership: Membership,
    ) -> Result<Membership, RepositoryError> {
        let mut tables = self.tables.write();
        let key = (membership.project_id, membership.user_id);
        if tables.members.contains_key(&key) {
            return Err(RepositoryError::DuplicateMember);
        }
        tables.members.insert(key, membership.clone());
        Ok(membership)
    }

    async fn remove_membership(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        self.tables
            .write()
            .members
            .remove(&(project_id, user_id))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound {
                resource: "membership",
            })
    }

    async fn list_memberships(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Membership>, RepositoryError> {
        let tables = self.tables.read();
        let mut members: Vec<Membership> = tables
            .members
            .values()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        members.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(members)
    }
}

#[async_trait]
impl InviteRepository for InMemoryMembershipStore {
    async fn create_invite(&self, invite: Invite) -> Result<Invite, RepositoryError> {
        self.tables
            .write()
            .invites
            .insert(invite.id, invite.clone());
        Ok(invite)
    }

    async fn get_invite(&self, id: InviteId) -> Result<Option<Invite>, RepositoryError> {
        Ok(self.tables.read().invites.get(&id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invite>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .invites
            .values()
            .find(|invite| invite.token == token)
            .cloned())
    }

    async fn transition_invite(
        &self,
        id: InviteId,
        from: InviteStatus,
        to: InviteStatus,
    ) -> Result<Invite, RepositoryError> {
        let mut tables = self.tables.write();
        let invite = tables
            .invites
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound { resource: "invite" })?;
        if invite.status != from {
            return Err(RepositoryError::StatusChanged);
        }
        invite.status = to;
        Ok(invite.clone())
    }
}
