//! Backend that resolves every call from seed data.
//!
//! Mirrors what a real backend would answer without any network I/O. Latency
//! and per-call failures can be configured so store behaviour under slow or
//! failing backends can be exercised in tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{ApiError, ApiResult, BackendCall, BackendClient};
use crate::fixtures::FixtureSet;
use roam_types::*;

/// Configuration for fixture backend behaviour
#[derive(Debug, Clone, Default)]
pub struct FixtureOptions {
    /// Delay before completing each call (simulates network latency)
    pub latency: Duration,
    /// Calls that fail with `ApiError::Injected` instead of resolving
    pub failing: HashSet<BackendCall>,
}

impl FixtureOptions {
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Default::default()
        }
    }

    /// Options where the given calls fail
    pub fn failing<I: IntoIterator<Item = BackendCall>>(calls: I) -> Self {
        Self {
            failing: calls.into_iter().collect(),
            ..Default::default()
        }
    }
}

pub struct FixtureBackend {
    data: FixtureSet,
    options: FixtureOptions,
    calls: Mutex<HashMap<BackendCall, usize>>,
    session_token: Mutex<Option<String>>,
}

impl FixtureBackend {
    pub fn new(data: FixtureSet, options: FixtureOptions) -> Self {
        Self {
            data,
            options,
            calls: Mutex::new(HashMap::new()),
            session_token: Mutex::new(None),
        }
    }

    /// Backend serving the built-in seed data with no latency or failures
    pub fn seeded() -> Self {
        Self::new(FixtureSet::seed(), FixtureOptions::default())
    }

    /// Number of times the given call has been made
    pub fn call_count(&self, call: BackendCall) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(&call).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Token issued by the last successful login, until logout
    pub fn session_token(&self) -> Option<String> {
        self.session_token.lock().ok().and_then(|token| token.clone())
    }

    fn set_session_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.session_token.lock() {
            *guard = token;
        }
    }

    /// Record the call, wait out the latency and apply failure injection
    async fn enter(&self, call: BackendCall) -> ApiResult<()> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(call).or_insert(0) += 1;
        }

        if !self.options.latency.is_zero() {
            tokio::time::sleep(self.options.latency).await;
        }

        if self.options.failing.contains(&call) {
            return Err(ApiError::Injected(call));
        }
        Ok(())
    }
}

impl Default for FixtureBackend {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl BackendClient for FixtureBackend {
    async fn list_posts(&self) -> ApiResult<Vec<Post>> {
        self.enter(BackendCall::ListPosts).await?;
        Ok(self.data.posts.clone())
    }

    async fn create_post(&self, author: &AuthorRef, request: &CreatePostRequest) -> ApiResult<Post> {
        self.enter(BackendCall::CreatePost).await?;
        let now = Utc::now();
        Ok(Post {
            id: Uuid::new_v4().to_string(),
            author: author.clone(),
            content: request.content.clone(),
            images: PostImage::from_urls(request.images.iter().cloned()),
            likes_count: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
            viewer_has_liked: false,
        })
    }

    async fn set_post_like(&self, _post_id: &str, _action: LikeAction) -> ApiResult<()> {
        self.enter(BackendCall::SetPostLike).await
    }

    async fn fetch_user_profile(&self, user_id: &str) -> ApiResult<UserProfile> {
        self.enter(BackendCall::FetchUserProfile).await?;
        self.data
            .profiles
            .iter()
            .find(|profile| profile.id == user_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("User {} not found", user_id)))
    }

    async fn set_following(&self, _user_id: &str, _action: FollowAction) -> ApiResult<()> {
        self.enter(BackendCall::SetFollowing).await
    }

    async fn list_notifications(&self) -> ApiResult<Vec<Notification>> {
        self.enter(BackendCall::ListNotifications).await?;
        Ok(self.data.notifications.clone())
    }

    async fn mark_notification_read(&self, _notification_id: &str) -> ApiResult<()> {
        self.enter(BackendCall::MarkNotificationRead).await
    }

    async fn mark_all_notifications_read(&self) -> ApiResult<()> {
        self.enter(BackendCall::MarkAllNotificationsRead).await
    }

    async fn list_conversations(&self) -> ApiResult<Vec<Conversation>> {
        self.enter(BackendCall::ListConversations).await?;
        Ok(self.data.conversations.clone())
    }

    async fn mark_conversation_read(&self, _conversation_id: &str) -> ApiResult<()> {
        self.enter(BackendCall::MarkConversationRead).await
    }

    async fn send_message(&self, _request: &SendMessageRequest) -> ApiResult<()> {
        self.enter(BackendCall::SendMessage).await
    }

    async fn list_comments(&self, post_id: &str) -> ApiResult<Vec<Comment>> {
        self.enter(BackendCall::ListComments).await?;
        Ok(self
            .data
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn create_comment(
        &self,
        post_id: &str,
        author: &AuthorRef,
        request: &CreateCommentRequest,
    ) -> ApiResult<Comment> {
        self.enter(BackendCall::CreateComment).await?;
        Ok(Comment {
            id: Uuid::new_v4().to_string(),
            post_id: post_id.to_string(),
            author_id: author.id.clone(),
            username: author.username.clone(),
            text: request.text.clone(),
            time: "now".to_string(),
        })
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.enter(BackendCall::Login).await?;
        if request.username.trim().is_empty() || request.password.is_empty() {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        let mut user = self.data.session_user.clone();
        user.username = request.username.trim().to_string();
        let session_token = Uuid::new_v4().to_string();
        self.set_session_token(Some(session_token.clone()));
        Ok(LoginResponse { user, session_token })
    }

    async fn logout(&self) -> ApiResult<()> {
        self.clear_session();
        self.enter(BackendCall::Logout).await
    }

    fn clear_session(&self) {
        self.set_session_token(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_backend_serves_posts_and_counts_calls() {
        let backend = FixtureBackend::seeded();
        let posts = backend.list_posts().await.unwrap();
        assert!(!posts.is_empty());
        backend.list_posts().await.unwrap();
        assert_eq!(backend.call_count(BackendCall::ListPosts), 2);
        assert_eq!(backend.call_count(BackendCall::CreatePost), 0);
    }

    #[tokio::test]
    async fn test_unknown_profile_is_not_found() {
        let backend = FixtureBackend::seeded();
        let result = backend.fetch_user_profile("999").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failing_call_returns_error_and_is_counted() {
        let backend = FixtureBackend::new(
            FixtureSet::seed(),
            FixtureOptions::failing([BackendCall::SetPostLike]),
        );
        assert!(matches!(
            backend.set_post_like("1", LikeAction::Like).await,
            Err(ApiError::Injected(BackendCall::SetPostLike))
        ));
        assert!(backend.list_posts().await.is_ok());
        assert_eq!(backend.call_count(BackendCall::SetPostLike), 1);
    }

    #[tokio::test]
    async fn test_login_rejects_blank_credentials() {
        let backend = FixtureBackend::seeded();
        let request = LoginRequest {
            username: "  ".to_string(),
            password: "secret".to_string(),
        };
        assert!(matches!(
            backend.login(&request).await,
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_login_and_logout_track_session() {
        let backend = FixtureBackend::seeded();
        let request = LoginRequest {
            username: "deniz".to_string(),
            password: "secret".to_string(),
        };
        let response = backend.login(&request).await.unwrap();
        assert_eq!(backend.session_token(), Some(response.session_token));

        backend.logout().await.unwrap();
        assert_eq!(backend.session_token(), None);
        assert_eq!(backend.call_count(BackendCall::Logout), 1);
    }

    #[tokio::test]
    async fn test_comments_are_filtered_by_post() {
        let backend = FixtureBackend::seeded();
        let comments = backend.list_comments("1").await.unwrap();
        assert!(comments.iter().all(|comment| comment.post_id == "1"));
        assert!(backend.list_comments("does-not-exist").await.unwrap().is_empty());
    }
}
