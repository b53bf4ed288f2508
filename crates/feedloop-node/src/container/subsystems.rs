//! # Subsystem Container
//!
//! Holds every subsystem instance for the lifetime of the node.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Admission controllers (no dependencies)
//! Level 1: Membership (membership/invite repositories)
//! Level 2: Feedback engine (feedback/tag repositories)
//! Level 3: Comments (feedback engine + comment repository)
//! ```
//!
//! Storage here is the in-memory adapter of each subsystem; a deployment
//! swaps in its own repository implementations at the same seams.

use std::sync::Arc;

use fl_01_admission::{AdmissionController, AdmissionLayer, KeyStrategy};
use fl_02_feedback::{CommentService, FeedbackService, InMemoryFeedbackStore};
use fl_03_membership::{InMemoryMembershipStore, MembershipService, RoleResolver};
use shared_types::{CallerIdentity, CallerRole, ProjectId, ServiceError};
use tracing::info;

use crate::container::config::NodeConfig;

pub type FeedbackEngine = FeedbackService<InMemoryFeedbackStore, InMemoryFeedbackStore>;
pub type CommentEngine = CommentService<FeedbackEngine, InMemoryFeedbackStore>;
pub type MembershipEngine = MembershipService<InMemoryMembershipStore, InMemoryMembershipStore>;

/// Protected route families, each with its own admission policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    Public,
    Authenticated,
    Sdk,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Policy::Public, Policy::Authenticated, Policy::Sdk];

    /// How requests under this policy are keyed.
    pub fn key_strategy(&self) -> KeyStrategy {
        match self {
            Policy::Public => KeyStrategy::Ip,
            Policy::Authenticated => KeyStrategy::Identity,
            Policy::Sdk => KeyStrategy::Sdk,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Public => "public",
            Policy::Authenticated => "authenticated",
            Policy::Sdk => "sdk",
        }
    }
}

/// Central container holding all subsystem instances.
pub struct SubsystemContainer {
    pub config: NodeConfig,

    // =========================================================================
    // LEVEL 0: Admission
    // =========================================================================
    pub public_admission: Arc<AdmissionController>,
    pub authenticated_admission: Arc<AdmissionController>,
    pub sdk_admission: Arc<AdmissionController>,

    // =========================================================================
    // LEVEL 1-3: Membership, feedback, comments
    // =========================================================================
    pub membership: Arc<MembershipEngine>,
    pub feedback: Arc<FeedbackEngine>,
    pub comments: Arc<CommentEngine>,

    /// Backing store shared by the feedback and comment services.
    pub feedback_store: Arc<InMemoryFeedbackStore>,
}

impl SubsystemContainer {
    pub fn new(config: NodeConfig) -> Self {
        let public_admission = Arc::new(AdmissionController::new(
            config.admission.public.clone(),
        ));
        let authenticated_admission = Arc::new(AdmissionController::new(
            config.admission.authenticated.clone(),
        ));
        let sdk_admission = Arc::new(AdmissionController::new(config.admission.sdk.clone()));
        info!("[fl-01] Admission controllers initialized");

        let membership_store = Arc::new(InMemoryMembershipStore::new());
        let membership = Arc::new(MembershipService::new(
            Arc::clone(&membership_store),
            membership_store,
            config.membership.clone(),
        ));
        info!("[fl-03] Membership initialized");

        let feedback_store = Arc::new(InMemoryFeedbackStore::new());
        let feedback = Arc::new(FeedbackService::new(
            Arc::clone(&feedback_store),
            Arc::clone(&feedback_store),
        ));
        let comments = Arc::new(CommentService::new(
            Arc::clone(&feedback),
            Arc::clone(&feedback_store),
        ));
        info!("[fl-02] Feedback engine initialized");

        Self {
            config,
            public_admission,
            authenticated_admission,
            sdk_admission,
            membership,
            feedback,
            comments,
            feedback_store,
        }
    }

    pub fn admission(&self, policy: Policy) -> &Arc<AdmissionController> {
        match policy {
            Policy::Public => &self.public_admission,
            Policy::Authenticated => &self.authenticated_admission,
            Policy::Sdk => &self.sdk_admission,
        }
    }

    /// Tower layer for a route family.
    pub fn admission_layer(&self, policy: Policy) -> AdmissionLayer {
        AdmissionLayer::new(Arc::clone(self.admission(policy)), policy.key_strategy())
    }

    /// Role of `identity` in `project_id`, as handed to the feedback engine.
    pub async fn caller_role(
        &self,
        project_id: ProjectId,
        identity: &CallerIdentity,
    ) -> Result<CallerRole, ServiceError> {
        Ok(self.membership.resolve(project_id, identity).await?)
    }
}
