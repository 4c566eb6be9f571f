use super::*;
use crate::api::{BackendCall, FixtureBackend, FixtureOptions};
use crate::fixtures::FixtureSet;
use crate::stores::MissingEntityPolicy;

fn app_with(options: FixtureOptions) -> AppState {
    let backend = FixtureBackend::new(FixtureSet::seed(), options);
    AppState::new(StoreContext::new(Arc::new(backend)))
}

fn app() -> AppState {
    app_with(FixtureOptions::default())
}

#[tokio::test]
async fn test_refresh_all_populates_every_domain() {
    let mut app = app();
    assert!(app.refresh_all().await);

    assert!(!app.posts.posts().is_empty());
    assert!(!app.notifications.notifications().is_empty());
    assert!(!app.messages.conversations().is_empty());
    assert!(!app.posts.status().loading);
    assert!(!app.notifications.status().loading);
    assert!(!app.messages.status().loading);
}

#[tokio::test]
async fn test_refresh_all_reports_partial_failure() {
    let mut app = app_with(FixtureOptions::failing([BackendCall::ListConversations]));
    assert!(!app.refresh_all().await);
    assert!(!app.posts.posts().is_empty());
    assert!(app.messages.status().error.is_some());
    assert!(!app.messages.status().loading);
}

#[tokio::test]
async fn test_create_post_requires_session() {
    let mut app = app();
    app.posts.fetch().await;
    let before = app.posts.posts().clone();

    assert!(!app.create_post("hello", Vec::new()).await);
    assert!(app.posts.posts().same_as(&before));
    assert_eq!(
        app.posts.status().error_message().as_deref(),
        Some("Sign in to share a post")
    );
}

#[tokio::test]
async fn test_create_post_as_signed_in_user() {
    let mut app = app();
    app.posts.fetch().await;
    app.session.login("deniz", "secret").await;
    let before = app.posts.posts().len();

    assert!(app.create_post("Sunset over Galata", vec!["sunset.jpg".to_string()]).await);
    assert_eq!(app.posts.posts().len(), before + 1);
    let first = app.posts.posts().first().unwrap();
    assert_eq!(first.content, "Sunset over Galata");
    assert_eq!(first.author.username, "deniz");
}

#[tokio::test]
async fn test_add_comment_counts_on_post() {
    let mut app = app();
    app.posts.fetch().await;
    app.comments.fetch("1").await;
    app.session.login("deniz", "secret").await;
    let comments_before = app.posts.get("1").unwrap().comments_count;

    assert!(app.add_comment("1", "Beautiful!").await);
    assert_eq!(app.comments.thread("1").len(), 3);
    assert_eq!(app.posts.get("1").unwrap().comments_count, comments_before + 1);
}

#[tokio::test]
async fn test_rejected_comment_does_not_count() {
    let mut app = app();
    app.posts.fetch().await;
    app.session.login("deniz", "secret").await;
    let comments_before = app.posts.get("1").unwrap().comments_count;

    assert!(!app.add_comment("1", "   ").await);
    assert_eq!(app.posts.get("1").unwrap().comments_count, comments_before);
}

#[tokio::test]
async fn test_settings_policy_reaches_stores() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roam.toml");
    std::fs::write(&path, "[stores]\nmissing_policy = \"report\"\n\n[logging]\nenabled = false\n").unwrap();
    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(settings.stores.missing_policy, MissingEntityPolicy::Report);

    let mut app = AppState::with_backend(Arc::new(FixtureBackend::seeded()), &settings);
    app.posts.fetch().await;
    assert!(!app.posts.like("missing").await);
    assert!(app.posts.status().error.as_ref().unwrap().is_not_found());
}

#[tokio::test]
async fn test_comment_after_failed_like_clears_post_error() {
    let mut app = app_with(FixtureOptions::failing([BackendCall::SetPostLike]));
    app.posts.fetch().await;
    app.session.login("deniz", "secret").await;

    assert!(!app.posts.like("1").await);
    assert!(app.posts.status().error.is_some());

    assert!(app.add_comment("1", "nice").await);
    assert!(app.posts.status().error.is_none());
}
