//! Ports Layer

pub mod inbound;
pub mod outbound;

pub use inbound::{MembershipApi, RoleResolver};
pub use outbound::{InviteRepository, MembershipRepository, RepositoryError};
