use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult, BackendClient};
use roam_types::*;

/// REST backend for the Roam API
pub struct HttpBackend {
    client: Client,
    base_url: String,
    session_token: RwLock<Option<String>>,
}

impl HttpBackend {
    /// Create a new HTTP backend
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the session token for authenticated requests
    pub fn set_session_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.session_token.write() {
            *guard = token;
        }
    }

    pub fn session_token(&self) -> Option<String> {
        self.session_token.read().ok().and_then(|guard| guard.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Helper to add session token to request if available
    fn add_auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = self.session_token() {
            req.header("X-Session-Token", token)
        } else {
            req
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = self.add_auth_header(req).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(classify_failure(status.as_u16(), error_text))
    }

    /// Helper to handle API responses
    async fn fetch_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ApiResult<T> {
        let response = self.send(req).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_empty(&self, req: reqwest::RequestBuilder) -> ApiResult<()> {
        self.send(req).await?;
        Ok(())
    }
}

/// Map a non-success status and body onto an `ApiError`
fn classify_failure(status: u16, error_text: String) -> ApiError {
    // Clean up HTML error messages (e.g., from nginx 404 pages)
    let clean_error = if error_text.contains("<html>") || error_text.contains("<!DOCTYPE") {
        format!("Server returned {} error. Please check the server URL.", status)
    } else {
        error_text
    };

    match status {
        404 => ApiError::NotFound(clean_error),
        401 => ApiError::Unauthorized(clean_error),
        400 => ApiError::BadRequest(clean_error),
        _ => ApiError::Api(clean_error),
    }
}

#[async_trait]
impl BackendClient for HttpBackend {
    // Post endpoints

    async fn list_posts(&self) -> ApiResult<Vec<Post>> {
        self.fetch_json(self.client.get(self.url("/posts"))).await
    }

    async fn create_post(&self, _author: &AuthorRef, request: &CreatePostRequest) -> ApiResult<Post> {
        self.fetch_json(self.client.post(self.url("/posts")).json(request))
            .await
    }

    async fn set_post_like(&self, post_id: &str, action: LikeAction) -> ApiResult<()> {
        let url = self.url(&format!("/posts/{}/like", urlencoding::encode(post_id)));
        let req = match action {
            LikeAction::Like => self.client.post(&url),
            LikeAction::Unlike => self.client.delete(&url),
        };
        self.fetch_empty(req).await
    }

    // Profile endpoints

    async fn fetch_user_profile(&self, user_id: &str) -> ApiResult<UserProfile> {
        let url = self.url(&format!("/users/{}/profile", urlencoding::encode(user_id)));
        self.fetch_json(self.client.get(&url)).await
    }

    async fn set_following(&self, user_id: &str, action: FollowAction) -> ApiResult<()> {
        let url = self.url(&format!("/users/{}/follow", urlencoding::encode(user_id)));
        let req = match action {
            FollowAction::Follow => self.client.post(&url),
            FollowAction::Unfollow => self.client.delete(&url),
        };
        self.fetch_empty(req).await
    }

    // Notification endpoints

    async fn list_notifications(&self) -> ApiResult<Vec<Notification>> {
        self.fetch_json(self.client.get(self.url("/notifications")))
            .await
    }

    async fn mark_notification_read(&self, notification_id: &str) -> ApiResult<()> {
        let url = self.url(&format!(
            "/notifications/{}/read",
            urlencoding::encode(notification_id)
        ));
        self.fetch_empty(self.client.post(&url)).await
    }

    async fn mark_all_notifications_read(&self) -> ApiResult<()> {
        self.fetch_empty(self.client.post(self.url("/notifications/read-all")))
            .await
    }

    // Direct message endpoints

    async fn list_conversations(&self) -> ApiResult<Vec<Conversation>> {
        self.fetch_json(self.client.get(self.url("/conversations")))
            .await
    }

    async fn mark_conversation_read(&self, conversation_id: &str) -> ApiResult<()> {
        let url = self.url(&format!(
            "/conversations/{}/read",
            urlencoding::encode(conversation_id)
        ));
        self.fetch_empty(self.client.post(&url)).await
    }

    async fn send_message(&self, request: &SendMessageRequest) -> ApiResult<()> {
        self.fetch_empty(self.client.post(self.url("/messages")).json(request))
            .await
    }

    // Comment endpoints

    async fn list_comments(&self, post_id: &str) -> ApiResult<Vec<Comment>> {
        let url = self.url(&format!("/posts/{}/comments", urlencoding::encode(post_id)));
        self.fetch_json(self.client.get(&url)).await
    }

    async fn create_comment(
        &self,
        post_id: &str,
        _author: &AuthorRef,
        request: &CreateCommentRequest,
    ) -> ApiResult<Comment> {
        let url = self.url(&format!("/posts/{}/comments", urlencoding::encode(post_id)));
        self.fetch_json(self.client.post(&url).json(request)).await
    }

    // Authentication endpoints

    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let response: LoginResponse = self
            .fetch_json(self.client.post(self.url("/auth/login")).json(request))
            .await?;

        // Store session token
        self.set_session_token(Some(response.session_token.clone()));

        Ok(response)
    }

    async fn logout(&self) -> ApiResult<()> {
        let Some(token) = self.session_token() else {
            return Ok(());
        };

        // Local token goes first so a failed call still signs out
        self.clear_session();
        let req = self
            .client
            .post(self.url("/auth/logout"))
            .header("X-Session-Token", token);
        self.fetch_empty(req).await
    }

    fn clear_session(&self) {
        self.set_session_token(None);
    }
}
