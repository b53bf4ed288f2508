//! Visibility rules.

use crate::domain::entities::Visibility;
use shared_types::CallerRole;

/// Team roles see everything; everyone else sees COMMUNITY items only.
pub fn can_view(role: CallerRole, visibility: Visibility) -> bool {
    role.is_team() || visibility == Visibility::Community
}

/// Visibility a list query is narrowed to for `role`.
///
/// Community callers are pinned to COMMUNITY whatever they asked for. Team
/// callers get their explicit filter, or no narrowing.
pub fn effective_visibility(role: CallerRole, requested: Option<Visibility>) -> Option<Visibility> {
    if role.is_team() {
        requested
    } else {
        Some(Visibility::Community)
    }
}
