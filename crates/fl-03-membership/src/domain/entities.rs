//! Membership entities.

use crate::domain::errors::MembershipError;
use serde::{Deserialize, Serialize};
use shared_types::{InviteId, ProjectId, TeamRole, Timestamp, UserId};

/// At most one per (project, user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub role: TeamRole,
    pub joined_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Revoked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub id: InviteId,
    pub project_id: ProjectId,
    /// Lowercased and trimmed.
    pub email: String,
    pub role: TeamRole,
    /// Opaque bearer token sent to the invitee.
    pub token: String,
    pub status: InviteStatus,
    pub expires_at: Timestamp,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

impl Invite {
    pub fn is_pending(&self) -> bool {
        self.status == InviteStatus::Pending
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

/// Lowercase and trim an address, rejecting obviously malformed input.
pub fn normalize_email(email: &str) -> Result<String, MembershipError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(MembershipError::Validation(format!(
            "invalid email address: {email}"
        ))),
    }
}
