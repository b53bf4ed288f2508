//! Merge preconditions and effects.
//!
//! Both the service (before calling the repository) and the repository
//! (atomically with the mutation) run [`check_merge`], so two concurrent
//! merges of the same source cannot both succeed.

use crate::domain::entities::Feedback;
use shared_types::{DomainCode, Timestamp};
use std::fmt;

/// Why a merge was refused. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeViolation {
    /// Source and canonical are the same item.
    SelfMerge,
    CrossProject,
    /// The target already redirects elsewhere; merging into it would chain.
    MergedCanonical,
    /// The source was merged before. Merges are not re-appliable.
    AlreadyMerged,
    /// Other items already redirect to the source; moving it would chain them.
    SourceIsCanonical,
}

impl MergeViolation {
    pub fn code(&self) -> DomainCode {
        match self {
            MergeViolation::SelfMerge => DomainCode::InvalidMergeTarget,
            MergeViolation::CrossProject => DomainCode::CrossProjectMerge,
            MergeViolation::MergedCanonical => DomainCode::MergedCanonical,
            MergeViolation::AlreadyMerged => DomainCode::AlreadyMerged,
            MergeViolation::SourceIsCanonical => DomainCode::MergedCanonical,
        }
    }
}

impl fmt::Display for MergeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeViolation::SelfMerge => write!(f, "cannot merge an item into itself"),
            MergeViolation::CrossProject => {
                write!(f, "source and canonical belong to different projects")
            }
            MergeViolation::MergedCanonical => {
                write!(f, "canonical item is itself merged")
            }
            MergeViolation::AlreadyMerged => write!(f, "source item is already merged"),
            MergeViolation::SourceIsCanonical => {
                write!(f, "source item is canonical for other items")
            }
        }
    }
}

/// Validate a merge of `source` into `canonical`.
pub fn check_merge(source: &Feedback, canonical: &Feedback) -> Result<(), MergeViolation> {
    if source.id == canonical.id {
        return Err(MergeViolation::SelfMerge);
    }
    if source.project_id != canonical.project_id {
        return Err(MergeViolation::CrossProject);
    }
    if canonical.canonical_id.is_some() {
        return Err(MergeViolation::MergedCanonical);
    }
    if source.canonical_id.is_some() {
        return Err(MergeViolation::AlreadyMerged);
    }
    if source.merge_count > 0 {
        return Err(MergeViolation::SourceIsCanonical);
    }
    Ok(())
}

/// Apply a validated merge: the source redirects and the canonical absorbs its votes.
pub fn apply_merge(source: &mut Feedback, canonical: &mut Feedback, now: Timestamp) {
    source.canonical_id = Some(canonical.id);
    source.updated_at = now;

    canonical.vote_count = canonical.vote_count.saturating_add(source.vote_count);
    canonical.merge_count = canonical.merge_count.saturating_add(1);
    canonical.updated_at = now;
}
