//! # Access Flows
//!
//! Membership decides the caller role; the feedback engine applies it.
//!
//! 1. **Invite → Role**: an accepted invite turns a community caller into a
//!    team caller for that project only
//! 2. **Role → Visibility**: TEAM_ONLY items are hidden from community callers
//! 3. **Merge → Redirect**: merged items resolve to their canonical for every
//!    caller allowed to see the canonical

#[cfg(test)]
mod tests {
    use feedloop_node::{NodeConfig, SubsystemContainer};
    use fl_02_feedback::{
        CommentApi, FeedbackApi, FeedbackFilter, FeedbackPatch, FeedbackStatus, NewComment,
        NewFeedback, Tag, Visibility,
    };
    use fl_03_membership::MembershipApi;
    use shared_types::{CallerIdentity, CallerRole, ServiceError, TeamRole};
    use uuid::Uuid;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Project {
        container: SubsystemContainer,
        id: Uuid,
        owner: Uuid,
    }

    impl Project {
        async fn new() -> Self {
            let container = SubsystemContainer::new(NodeConfig::default());
            let (id, owner) = (Uuid::new_v4(), Uuid::new_v4());
            container
                .membership
                .add_member(id, owner, TeamRole::Owner)
                .await
                .unwrap();
            Self {
                container,
                id,
                owner,
            }
        }

        async fn role_of(&self, identity: CallerIdentity) -> CallerRole {
            self.container.caller_role(self.id, &identity).await.unwrap()
        }

        async fn submit(&self, title: &str, visibility: Visibility) -> Uuid {
            let mut new = NewFeedback::new(title);
            new.visibility = Some(visibility);
            self.container
                .feedback
                .submit(self.id, new, Some(self.owner))
                .await
                .unwrap()
                .id
        }
    }

    // =============================================================================
    // INVITE → ROLE → VISIBILITY
    // =============================================================================

    #[tokio::test]
    async fn test_accepted_invite_unlocks_team_only_items() {
        let project = Project::new().await;
        let item = project.submit("Crash on save", Visibility::TeamOnly).await;
        let invitee = Uuid::new_v4();

        let before = project.role_of(CallerIdentity::user(invitee)).await;
        assert_eq!(before, CallerRole::Community);
        let err: ServiceError = project
            .container
            .feedback
            .get(project.id, item, before)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.status_hint(), 403);

        let invite = project
            .container
            .membership
            .create_invite(project.id, "dev@example.com", TeamRole::Member, project.owner)
            .await
            .unwrap();
        project
            .container
            .membership
            .accept_invite(&invite.token, invitee)
            .await
            .unwrap();

        let after = project.role_of(CallerIdentity::user(invitee)).await;
        assert_eq!(after, CallerRole::Team(TeamRole::Member));
        let resolved = project
            .container
            .feedback
            .get(project.id, item, after)
            .await
            .unwrap();
        assert_eq!(resolved.id, item);
    }

    #[tokio::test]
    async fn test_membership_is_per_project() {
        let project = Project::new().await;
        let other = Uuid::new_v4();
        let role = project
            .container
            .caller_role(other, &CallerIdentity::user(project.owner))
            .await
            .unwrap();
        assert_eq!(role, CallerRole::Community);
    }

    #[tokio::test]
    async fn test_sdk_submissions_are_community_callers() {
        let project = Project::new().await;
        let role = project.role_of(CallerIdentity::sdk(project.id)).await;
        assert_eq!(role, CallerRole::Community);

        let submitted = project
            .container
            .feedback
            .submit(project.id, NewFeedback::new("From the widget"), None)
            .await
            .unwrap();
        assert_eq!(submitted.author_id, None);
        assert_eq!(submitted.visibility, Visibility::TeamOnly);

        let page = project
            .container
            .feedback
            .list(project.id, &FeedbackFilter::default(), role)
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    // =============================================================================
    // MERGE → REDIRECT
    // =============================================================================

    #[tokio::test]
    async fn test_merged_duplicate_redirects_and_leaves_list() {
        let project = Project::new().await;
        let canonical = project.submit("Dark mode", Visibility::Community).await;
        let duplicate = project.submit("Please add dark mode", Visibility::TeamOnly).await;

        project
            .container
            .feedback
            .merge(duplicate, canonical, project.owner)
            .await
            .unwrap();

        let community = project.role_of(CallerIdentity::anonymous()).await;
        let resolved = project
            .container
            .feedback
            .get(project.id, duplicate, community)
            .await
            .unwrap();
        assert_eq!(resolved.id, canonical);
        assert_eq!(resolved.merge_count, 1);

        let team = project.role_of(CallerIdentity::user(project.owner)).await;
        let page = project
            .container
            .feedback
            .list(project.id, &FeedbackFilter::default(), team)
            .await
            .unwrap();
        let ids: Vec<Uuid> = page.items.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![canonical]);
    }

    #[tokio::test]
    async fn test_comments_follow_merge_redirect() {
        let project = Project::new().await;
        let canonical = project.submit("Export to CSV", Visibility::Community).await;
        let duplicate = project.submit("CSV export", Visibility::Community).await;
        project
            .container
            .feedback
            .merge(duplicate, canonical, project.owner)
            .await
            .unwrap();

        let team = project.role_of(CallerIdentity::user(project.owner)).await;
        project
            .container
            .comments
            .add(
                project.id,
                duplicate,
                team,
                NewComment {
                    author_id: project.owner,
                    body: "Tracking here".into(),
                    parent_id: None,
                },
            )
            .await
            .unwrap();

        let on_canonical = project
            .container
            .comments
            .list(project.id, canonical, CallerRole::Community)
            .await
            .unwrap();
        assert_eq!(on_canonical.len(), 1);
        assert_eq!(on_canonical[0].feedback_id, canonical);
    }

    // =============================================================================
    // UPDATE + TAGS
    // =============================================================================

    #[tokio::test]
    async fn test_update_reconciles_tags_once() {
        let project = Project::new().await;
        let item = project.submit("Slow search", Visibility::TeamOnly).await;
        let tags: Vec<Tag> = ["perf", "search", "ux"]
            .iter()
            .map(|name| Tag {
                id: Uuid::new_v4(),
                project_id: project.id,
                name: name.to_string(),
                color: None,
            })
            .collect();
        for tag in &tags {
            project.container.feedback_store.insert_tag(tag.clone());
        }

        let feedback = &project.container.feedback;
        let patch = |ids: Vec<Uuid>| FeedbackPatch {
            tag_ids: Some(ids),
            ..FeedbackPatch::default()
        };
        feedback
            .update(item, patch(vec![tags[0].id, tags[1].id]), project.owner)
            .await
            .unwrap();
        project.container.feedback_store.clear_tag_writes();

        let updated = feedback
            .update(
                item,
                FeedbackPatch {
                    status: Some(FeedbackStatus::Completed),
                    ..patch(vec![tags[0].id, tags[2].id])
                },
                project.owner,
            )
            .await
            .unwrap();

        assert_eq!(project.container.feedback_store.tag_writes().len(), 2);
        assert!(updated.resolved_at.is_some());
        let mut names: Vec<&str> = updated.tags.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["perf", "ux"]);
    }
}
