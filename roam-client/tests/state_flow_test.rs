use std::sync::Arc;

use roam::api::{ApiError, BackendCall, FixtureBackend, FixtureOptions};
use roam::app::AppState;
use roam::fixtures::FixtureSet;
use roam::stores::{MissingEntityPolicy, StoreContext};

fn app_with(options: FixtureOptions) -> (Arc<FixtureBackend>, AppState) {
    let backend = Arc::new(FixtureBackend::new(FixtureSet::seed(), options));
    let app = AppState::new(StoreContext::new(backend.clone()));
    (backend, app)
}

#[tokio::test]
async fn test_like_then_unlike_shares_untouched_posts() {
    let (_, mut app) = app_with(FixtureOptions::default());
    assert!(app.posts.fetch().await);

    let before = app.posts.posts().clone();
    assert_eq!(before.get("1").unwrap().likes_count, 42);

    assert!(app.posts.like("1").await);
    let liked = app.posts.posts().clone();
    assert!(!liked.same_as(&before));
    assert_eq!(liked.get("1").unwrap().likes_count, 43);
    assert!(liked.get("1").unwrap().viewer_has_liked);
    assert!(Arc::ptr_eq(before.get("2").unwrap(), liked.get("2").unwrap()));

    assert!(app.posts.unlike("1").await);
    let post = app.posts.get("1").unwrap();
    assert_eq!(post.likes_count, 42);
    assert!(!post.viewer_has_liked);
    assert!(app.posts.status().error.is_none());
}

#[tokio::test]
async fn test_failed_like_restores_feed() {
    let (backend, mut app) = app_with(FixtureOptions::failing([BackendCall::SetPostLike]));
    app.posts.fetch().await;
    let before = app.posts.posts().clone();

    assert!(!app.posts.like("1").await);
    assert!(app.posts.posts().same_as(&before));
    assert_eq!(app.posts.get("1").unwrap().likes_count, 42);
    assert_eq!(backend.call_count(BackendCall::SetPostLike), 1);
    assert!(app
        .posts
        .status()
        .error_message()
        .unwrap()
        .starts_with("Could not like post"));
}

#[tokio::test]
async fn test_stale_fetch_is_discarded() {
    let (backend, mut app) = app_with(FixtureOptions::default());
    let older = app.posts.begin_fetch();
    let newer = app.posts.begin_fetch();

    let fresh = FixtureSet::seed().posts.into_iter().take(1).collect();
    assert!(app.posts.complete_fetch(newer, Ok(fresh)));
    assert_eq!(app.posts.posts().len(), 1);

    let late = roam::api::BackendClient::list_posts(backend.as_ref()).await;
    assert!(!app.posts.complete_fetch(older, late));
    assert_eq!(app.posts.posts().len(), 1);

    // A late failure doesn't clobber the status either
    assert!(!app
        .posts
        .complete_fetch(older, Err(ApiError::Api("timeout".to_string()))));
    assert!(app.posts.status().error.is_none());
    assert!(!app.posts.status().loading);
}

#[tokio::test]
async fn test_follow_flow_through_user_store() {
    let (_, mut app) = app_with(FixtureOptions::default());
    assert!(app.users.fetch_profile("2").await);
    let followers = app.users.get("2").unwrap().followers_count;

    assert!(app.users.follow("2").await);
    let profile = app.users.get("2").unwrap();
    assert!(profile.is_following);
    assert_eq!(profile.followers_count, followers + 1);

    // Following twice changes nothing
    assert!(!app.users.follow("2").await);
    assert_eq!(app.users.get("2").unwrap().followers_count, followers + 1);
}

#[tokio::test]
async fn test_unread_totals_follow_reads() {
    let (_, mut app) = app_with(FixtureOptions::default());
    assert!(app.refresh_all().await);
    assert_eq!(app.notifications.unread_count(), 2);
    assert_eq!(app.messages.unread_count(), 2);

    assert!(app.notifications.mark_all_read().await);
    assert_eq!(app.notifications.unread_count(), 0);

    assert!(app.messages.mark_read("1").await);
    assert_eq!(app.messages.unread_count(), 0);
}

#[tokio::test]
async fn test_missing_ids_follow_policy() {
    let backend = Arc::new(FixtureBackend::seeded());
    let mut quiet = AppState::new(StoreContext::new(backend.clone()));
    quiet.posts.fetch().await;
    assert!(!quiet.posts.like("nope").await);
    assert!(quiet.posts.status().error.is_none());

    let mut loud = AppState::new(
        StoreContext::new(backend).with_policy(MissingEntityPolicy::Report),
    );
    loud.posts.fetch().await;
    assert!(!loud.posts.like("nope").await);
    assert_eq!(
        loud.posts.status().error_message().as_deref(),
        Some("No post with id nope")
    );
}
