//! List filtering, sorting and pagination.

use crate::domain::entities::{Feedback, FeedbackStatus, FeedbackType, Visibility};
use crate::domain::visibility::effective_visibility;
use serde::{Deserialize, Serialize};
use shared_types::{CallerRole, TagId, UserId};
use std::cmp::Ordering;
use std::collections::BTreeSet;

pub const DEFAULT_PER_PAGE: u32 = 50;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Votes,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Caller-supplied list parameters, as received.
///
/// Paging values are signed so out-of-range input can be normalised rather
/// than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackFilter {
    pub feedback_type: Option<FeedbackType>,
    pub status: Option<FeedbackStatus>,
    pub visibility: Option<Visibility>,
    /// Matches items carrying any of these tags.
    pub tag_ids: Vec<TagId>,
    pub assignee_id: Option<UserId>,
    /// Case-insensitive substring over title and description.
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    pub direction: Option<SortDirection>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Normalised page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    /// `page` < 1 or absent → 1. `per_page` < 1 or absent → 50; > 100 → 100.
    pub fn resolve(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p.min(u32::MAX as i64) as u32,
            _ => 1,
        };
        let per_page = match per_page {
            Some(n) if n < 1 => DEFAULT_PER_PAGE,
            Some(n) => n.min(MAX_PER_PAGE as i64) as u32,
            None => DEFAULT_PER_PAGE,
        };
        Self { page, per_page }
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    pub fn limit(&self) -> u64 {
        self.per_page as u64
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page as u64)
    }
}

/// Resolved query handed to the repository.
///
/// Merged items are always excluded; visibility is already narrowed for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackQuery {
    pub feedback_type: Option<FeedbackType>,
    pub status: Option<FeedbackStatus>,
    pub visibility: Option<Visibility>,
    pub tag_ids: BTreeSet<TagId>,
    pub assignee_id: Option<UserId>,
    /// Lowercased, trimmed; `None` when blank.
    pub search: Option<String>,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub pagination: Pagination,
}

impl FeedbackQuery {
    pub fn for_caller(filter: &FeedbackFilter, role: CallerRole) -> Self {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Self {
            feedback_type: filter.feedback_type,
            status: filter.status,
            visibility: effective_visibility(role, filter.visibility),
            tag_ids: filter.tag_ids.iter().copied().collect(),
            assignee_id: filter.assignee_id,
            search,
            sort: filter.sort.unwrap_or_default(),
            direction: filter.direction.unwrap_or_default(),
            pagination: Pagination::resolve(filter.page, filter.per_page),
        }
    }

    /// Whether `item` (with its current `tags`) passes every filter.
    pub fn matches(&self, item: &Feedback, tags: &BTreeSet<TagId>) -> bool {
        if item.is_merged() {
            return false;
        }
        if self.feedback_type.is_some_and(|t| t != item.feedback_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != item.status) {
            return false;
        }
        if self.visibility.is_some_and(|v| v != item.visibility) {
            return false;
        }
        if self.assignee_id.is_some() && self.assignee_id != item.assignee_id {
            return false;
        }
        if !self.tag_ids.is_empty() && self.tag_ids.is_disjoint(tags) {
            return false;
        }
        if let Some(needle) = &self.search {
            let hit = item.title.to_lowercase().contains(needle)
                || item.description.to_lowercase().contains(needle);
            if !hit {
                return false;
            }
        }
        true
    }

    /// Order two items by the requested key. Ties break on id for stable pages.
    pub fn compare(&self, a: &Feedback, b: &Feedback) -> Ordering {
        let ordering = match self.sort {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::Votes => a.vote_count.cmp(&b.vote_count),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
        .then_with(|| a.id.cmp(&b.id));

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackPage {
    pub items: Vec<Feedback>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

impl FeedbackPage {
    pub fn new(items: Vec<Feedback>, total: u64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            per_page: pagination.per_page,
            total_pages: pagination.total_pages(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewFeedback;
    use shared_types::TeamRole;
    use uuid::Uuid;

    #[test]
    fn test_pagination_defaults_and_clamps() {
        assert_eq!(Pagination::resolve(None, None), Pagination::default());
        assert_eq!(Pagination::resolve(Some(0), None).page, 1);
        assert_eq!(Pagination::resolve(Some(-4), None).page, 1);
        assert_eq!(Pagination::resolve(None, Some(500)).per_page, 100);
        assert_eq!(Pagination::resolve(None, Some(0)).per_page, 50);
        assert_eq!(Pagination::resolve(None, Some(-1)).per_page, 50);
        assert_eq!(Pagination::resolve(None, Some(1)).per_page, 1);
        assert_eq!(Pagination::resolve(None, Some(100)).per_page, 100);
    }

    #[test]
    fn test_offset_and_total_pages() {
        let p = Pagination::resolve(Some(3), Some(20));
        assert_eq!(p.offset(), 40);
        assert_eq!(p.total_pages(41), 3);
        assert_eq!(p.total_pages(40), 2);
        assert_eq!(p.total_pages(0), 0);
    }

    #[test]
    fn test_community_caller_pinned_to_community() {
        let filter = FeedbackFilter {
            visibility: Some(Visibility::TeamOnly),
            ..Default::default()
        };
        let query = FeedbackQuery::for_caller(&filter, CallerRole::Community);
        assert_eq!(query.visibility, Some(Visibility::Community));

        let query = FeedbackQuery::for_caller(&filter, CallerRole::Team(TeamRole::Member));
        assert_eq!(query.visibility, Some(Visibility::TeamOnly));
    }

    #[test]
    fn test_matches_search_and_tags() {
        let mut item = NewFeedback::new("Export to CSV").into_feedback(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            0,
        );
        item.description = "Needs a Download button".into();
        let tag = Uuid::new_v4();

        let query = FeedbackQuery::for_caller(
            &FeedbackFilter {
                search: Some(" download ".into()),
                tag_ids: vec![tag, Uuid::new_v4()],
                ..Default::default()
            },
            CallerRole::Team(TeamRole::Admin),
        );
        assert!(query.matches(&item, &BTreeSet::from([tag])));
        assert!(!query.matches(&item, &BTreeSet::new()));

        item.canonical_id = Some(Uuid::new_v4());
        assert!(!query.matches(&item, &BTreeSet::from([tag])));
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let project = Uuid::new_v4();
        let older = NewFeedback::new("a").into_feedback(Uuid::new_v4(), project, None, 1);
        let newer = NewFeedback::new("b").into_feedback(Uuid::new_v4(), project, None, 2);
        let query = FeedbackQuery::for_caller(&FeedbackFilter::default(), CallerRole::Community);
        assert_eq!(query.compare(&newer, &older), Ordering::Less);
    }
}
