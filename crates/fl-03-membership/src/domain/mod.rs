//! Domain layer for membership.

pub mod config;
pub mod entities;
pub mod errors;
pub mod token;

pub use config::{ConfigError, MembershipConfig};
pub use entities::{normalize_email, Invite, InviteStatus, Membership};
pub use errors::MembershipError;
pub use token::generate_invite_token;
