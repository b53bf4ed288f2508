//! # FL-03 Membership
//!
//! Project membership, invitations, and the role lookup that turns a
//! [`shared_types::CallerIdentity`] into a [`shared_types::CallerRole`] for
//! the feedback engine.
//!
//! ## Invite Lifecycle
//!
//! ```text
//! create_invite ──► pending ──accept──► accepted
//!                      │
//!                      └──revoke──► revoked
//! ```
//!
//! Accepting an expired or unknown token fails with `INVITE_INVALID`; any
//! transition out of a non-pending invite fails with `INVITE_NOT_PENDING`.
//!
//! ## Role Resolution
//!
//! | Identity           | Member? | Role                 |
//! |--------------------|---------|----------------------|
//! | User               | yes     | `Team(member role)`  |
//! | User               | no      | `Community`          |
//! | SDK / Anonymous    | -       | `Community`          |

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryMembershipStore;
pub use domain::*;
pub use ports::*;
pub use service::MembershipService;
