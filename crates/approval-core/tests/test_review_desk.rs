//! Admin desk: refresh after success, stale list after failure

mod common;

use approval_core::{
    ApprovalWorkflow, FeedFilter, InMemoryProfileStore, MediaResolver, NoticeLevel, ProfileStore, ReviewDesk,
    ReviewFeed,
};
use approval_types::{ActionPayload, Actor, ApprovalStatus, ReviewAction, Role, SortOrder};
use common::*;
use std::sync::Arc;

fn desk(store: Arc<InMemoryProfileStore>, actor: Actor) -> ReviewDesk<InMemoryProfileStore> {
    ReviewDesk::new(
        actor,
        ApprovalWorkflow::new(store.clone()),
        ReviewFeed::new(store, MediaResolver::new("https://media.example.org", "profile-media")),
        SortOrder::OldestFirst,
    )
}

#[tokio::test]
async fn test_successful_action_refreshes_current_view() {
    let store = Arc::new(InMemoryProfileStore::new());
    let acme = submit(store.as_ref(), "u1", startup_fields("Acme")).await;
    submit(store.as_ref(), "u2", mentor_fields("Kiran")).await;

    let desk = desk(store.clone(), Actor::admin("alice"));
    assert_eq!(desk.refresh().await.unwrap().len(), 2);

    let outcome = desk
        .act(Role::Startup, &acme.id, ReviewAction::Approve, &ActionPayload::default())
        .await
        .unwrap();

    let entries = desk.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].display_name, "Kiran");

    let notices = desk.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].message, outcome.message);
    assert!(desk.take_notices().is_empty());

    // The approved slice now shows the live row
    let approved = desk
        .set_filter(FeedFilter { role: None, status: ApprovalStatus::Approved })
        .await
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].profile_id, acme.id);
    assert!(approved[0].approved_at.is_some());
}

#[tokio::test]
async fn test_failed_action_leaves_list_stale() {
    let store = Arc::new(InMemoryProfileStore::new());
    let kiran = submit(store.as_ref(), "u2", mentor_fields("Kiran")).await;

    let desk = desk(store.clone(), Actor::admin("alice"));
    desk.refresh().await.unwrap();

    // Row changes behind the desk's back
    store
        .update_approval_status(Role::Mentor, &kiran.id, ApprovalStatus::Rejected, None, chrono::Utc::now())
        .await
        .unwrap();

    let err = desk
        .act(Role::Mentor, &kiran.id, ReviewAction::Rate, &ActionPayload::with_rating(90))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not supported"));

    let entries = desk.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, ApprovalStatus::Pending);

    let notices = desk.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_member_cannot_use_desk() {
    let store = Arc::new(InMemoryProfileStore::new());
    let acme = submit(store.as_ref(), "u1", startup_fields("Acme")).await;

    let desk = desk(store.clone(), Actor::member("u1"));
    let err = desk
        .act(Role::Startup, &acme.id, ReviewAction::Approve, &ActionPayload::default())
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Forbidden"));
    assert_eq!(store.live_count(Role::Startup).await, 0);
    assert!(!desk.is_busy(Role::Startup, &acme.id));
}
