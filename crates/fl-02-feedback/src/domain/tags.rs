//! Tag reconciliation.

use shared_types::TagId;
use std::collections::BTreeSet;

/// Writes needed to move a feedback item from its current tag set to a desired one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDelta {
    /// Present only in the desired set.
    pub attach: Vec<TagId>,
    /// Present only in the current set.
    pub detach: Vec<TagId>,
}

impl TagDelta {
    /// Symmetric difference of one snapshot against the desired set.
    /// Tags in both sets produce no write.
    pub fn compute(current: &BTreeSet<TagId>, desired: &BTreeSet<TagId>) -> Self {
        Self {
            attach: desired.difference(current).copied().collect(),
            detach: current.difference(desired).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attach.is_empty() && self.detach.is_empty()
    }

    pub fn write_count(&self) -> usize {
        self.attach.len() + self.detach.len()
    }
}
