//! # Caller Identity
//!
//! The auth layer (outside this workspace) resolves a request into a
//! [`CallerIdentity`] and stores it in the request extensions. Subsystems then
//! turn it into a [`CallerRole`] for a given project.

use crate::entities::{ProjectId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who is making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Subject {
    /// Signed-in user.
    User(UserId),
    /// In-app SDK authenticated by project key.
    Sdk(ProjectId),
    /// No credentials.
    Anonymous,
}

/// Identity attached to a request by the auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub subject: Subject,
}

impl CallerIdentity {
    pub fn user(id: UserId) -> Self {
        Self {
            subject: Subject::User(id),
        }
    }

    pub fn sdk(project_id: ProjectId) -> Self {
        Self {
            subject: Subject::Sdk(project_id),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            subject: Subject::Anonymous,
        }
    }

    /// User id, if the caller is a signed-in user.
    pub fn user_id(&self) -> Option<UserId> {
        match self.subject {
            Subject::User(id) => Some(id),
            _ => None,
        }
    }

    /// SDK project id, if the caller is an SDK client.
    pub fn sdk_project(&self) -> Option<ProjectId> {
        match self.subject {
            Subject::Sdk(id) => Some(id),
            _ => None,
        }
    }
}

/// Team roles, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Viewer,
    Member,
    Admin,
    Owner,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Viewer => "viewer",
            TeamRole::Member => "member",
            TeamRole::Admin => "admin",
            TeamRole::Owner => "owner",
        }
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a caller relative to one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    /// Anonymous visitors, SDK clients and signed-in non-members.
    Community,
    /// Project member with the given role.
    Team(TeamRole),
}

impl CallerRole {
    /// Team roles see every visibility; community callers see COMMUNITY only.
    pub fn is_team(&self) -> bool {
        matches!(self, CallerRole::Team(_))
    }

    /// Team role, if any.
    pub fn team_role(&self) -> Option<TeamRole> {
        match self {
            CallerRole::Team(role) => Some(*role),
            CallerRole::Community => None,
        }
    }
}

impl fmt::Display for CallerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallerRole::Community => f.write_str("community"),
            CallerRole::Team(role) => write!(f, "team:{}", role),
        }
    }
}
