use async_trait::async_trait;
use roam_types::{
    AuthorRef, Comment, Conversation, CreateCommentRequest, CreatePostRequest, FollowAction,
    LikeAction, LoginRequest, LoginResponse, Notification, Post, SendMessageRequest, UserProfile,
};

use super::ApiResult;

/// Names each backend call, used for call accounting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendCall {
    ListPosts,
    CreatePost,
    SetPostLike,
    FetchUserProfile,
    SetFollowing,
    ListNotifications,
    MarkNotificationRead,
    MarkAllNotificationsRead,
    ListConversations,
    MarkConversationRead,
    SendMessage,
    ListComments,
    CreateComment,
    Login,
    Logout,
}

/// Transport the state stores talk to.
///
/// Stores apply their optimistic update first and then await one of these
/// calls; an `Err` makes the store restore its snapshot.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn list_posts(&self) -> ApiResult<Vec<Post>>;

    /// Create a post. The returned post is the backend's confirmed copy.
    async fn create_post(&self, author: &AuthorRef, request: &CreatePostRequest) -> ApiResult<Post>;

    async fn set_post_like(&self, post_id: &str, action: LikeAction) -> ApiResult<()>;

    async fn fetch_user_profile(&self, user_id: &str) -> ApiResult<UserProfile>;

    async fn set_following(&self, user_id: &str, action: FollowAction) -> ApiResult<()>;

    async fn list_notifications(&self) -> ApiResult<Vec<Notification>>;

    async fn mark_notification_read(&self, notification_id: &str) -> ApiResult<()>;

    async fn mark_all_notifications_read(&self) -> ApiResult<()>;

    async fn list_conversations(&self) -> ApiResult<Vec<Conversation>>;

    async fn mark_conversation_read(&self, conversation_id: &str) -> ApiResult<()>;

    async fn send_message(&self, request: &SendMessageRequest) -> ApiResult<()>;

    async fn list_comments(&self, post_id: &str) -> ApiResult<Vec<Comment>>;

    async fn create_comment(
        &self,
        post_id: &str,
        author: &AuthorRef,
        request: &CreateCommentRequest,
    ) -> ApiResult<Comment>;

    /// Sign in. Transports that authenticate later requests keep the token.
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse>;

    /// Invalidate the session on the backend. The local token is dropped
    /// even when the call fails.
    async fn logout(&self) -> ApiResult<()>;

    /// Drop any session token held by the transport without calling the backend
    fn clear_session(&self);
}
