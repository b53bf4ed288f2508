//! Domain layer for the Feedback Resolution Engine.

pub mod comment;
pub mod entities;
pub mod errors;
pub mod merge;
pub mod patch;
pub mod query;
pub mod tags;
pub mod visibility;

pub use comment::{validate_comment_body, Comment, NewComment, MAX_COMMENT_LEN};
pub use entities::{
    validate_title, Feedback, FeedbackStatus, FeedbackType, MergeState, NewFeedback, Severity,
    Tag, Visibility, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN,
};
pub use errors::FeedbackError;
pub use merge::{apply_merge, check_merge, MergeViolation};
pub use patch::FeedbackPatch;
pub use query::{
    FeedbackFilter, FeedbackPage, FeedbackQuery, Pagination, SortDirection, SortKey,
    DEFAULT_PER_PAGE, MAX_PER_PAGE,
};
pub use tags::TagDelta;
pub use visibility::can_view;
