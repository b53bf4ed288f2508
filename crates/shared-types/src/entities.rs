//! # Identifiers
//!
//! Every persistent entity is addressed by a UUID. The aliases below exist so
//! signatures say which kind of id they expect.

use uuid::Uuid;

/// Project (tenant) identifier.
pub type ProjectId = Uuid;

/// User account identifier.
pub type UserId = Uuid;

/// Feedback item identifier.
pub type FeedbackId = Uuid;

/// Project-scoped tag identifier.
pub type TagId = Uuid;

/// Comment identifier.
pub type CommentId = Uuid;

/// Invitation identifier.
pub type InviteId = Uuid;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Generate a fresh random identifier.
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// Convert a millisecond timestamp to whole epoch seconds.
pub fn to_epoch_secs(ts: Timestamp) -> u64 {
    ts / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn test_to_epoch_secs_truncates() {
        assert_eq!(to_epoch_secs(60_999), 60);
        assert_eq!(to_epoch_secs(0), 0);
    }
}
