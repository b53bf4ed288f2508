//! # FL-02 Feedback Resolution Engine
//!
//! Decides what a feedback item looks like to a given caller, follows merge
//! redirects, and applies invariant-preserving updates.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure business logic, no I/O
//!   - `Feedback`, `Tag`, `Comment`: entities
//!   - `FeedbackPatch`: partial update with present/absent/cleared fields
//!   - `check_merge` / `apply_merge`: merge preconditions and effects
//!   - `TagDelta`: attach/detach set difference
//!   - `FeedbackFilter` / `Pagination`: list narrowing and paging
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `FeedbackApi`, `CommentApi`: driving ports
//!   - `FeedbackRepository`, `TagRepository`, `TagTransactions`,
//!     `CommentRepository`: driven ports
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `FeedbackService`: implements `FeedbackApi`
//!   - `CommentService`: implements `CommentApi` on top of `FeedbackApi`
//!
//! - **Adapters Layer** (`adapters/`)
//!   - `InMemoryFeedbackStore`: all repositories behind one `RwLock`
//!
//! ## Merge State Machine
//!
//! ```text
//!              merge (as source)
//! standalone ─────────────────────► merged      (terminal)
//!     │
//!     │ merge (as target)
//!     ▼
//! canonical ◄──── further sources
//! ```
//!
//! `merged` and `canonical` are mutually exclusive, so every redirect is
//! exactly one hop.
//!
//! ## Visibility
//!
//! | Caller role | TEAM_ONLY | COMMUNITY |
//! |-------------|-----------|-----------|
//! | Team (any)  | ✓         | ✓         |
//! | Community   | Forbidden | ✓         |
//!
//! Cross-project access always reports NotFound.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryFeedbackStore;
pub use domain::*;
pub use ports::*;
pub use service::{CommentService, FeedbackService};
