use std::sync::Arc;

use crate::api::BackendClient;
use crate::log_debug;
use crate::logging::LogConfig;
use crate::settings::Settings;
use crate::stores::{
    CommentStore, MessageStore, NotificationStore, PostDraft, PostStore, SessionStore,
    StoreContext, StoreError, UserStore,
};

#[cfg(test)]
mod tests;

/// Application state: one store per domain, sharing one backend.
///
/// Constructed explicitly and handed to consumers by reference; there is no
/// global instance.
pub struct AppState {
    pub posts: PostStore,
    pub users: UserStore,
    pub notifications: NotificationStore,
    pub messages: MessageStore,
    pub comments: CommentStore,
    pub session: SessionStore,
    log_config: LogConfig,
}

impl AppState {
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            posts: PostStore::new(ctx.clone()),
            users: UserStore::new(ctx.clone()),
            notifications: NotificationStore::new(ctx.clone()),
            messages: MessageStore::new(ctx.clone()),
            comments: CommentStore::new(ctx.clone()),
            session: SessionStore::new(ctx.clone()),
            log_config: ctx.log,
        }
    }

    /// State wired to the backend, policy and logging the settings select
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_backend(settings.build_backend(), settings)
    }

    pub fn with_backend(client: Arc<dyn BackendClient>, settings: &Settings) -> Self {
        let ctx = StoreContext::new(client)
            .with_policy(settings.stores.missing_policy)
            .with_log(LogConfig::from_settings(&settings.logging));
        Self::new(ctx)
    }

    /// Publish a post as the signed-in user
    pub async fn create_post(&mut self, content: &str, images: Vec<String>) -> bool {
        let Some(user) = self.session.current_user() else {
            log_debug!(self.log_config, "create_post without a session");
            self.posts
                .set_error(StoreError::validation("Sign in to share a post"));
            return false;
        };

        let draft = PostDraft::new(user.author_ref(), content).with_images(images);
        self.posts.create(draft).await
    }

    /// Comment on a post as the signed-in user and count it on the post
    pub async fn add_comment(&mut self, post_id: &str, text: &str) -> bool {
        let Some(author) = self.session.current_user().map(|user| user.author_ref()) else {
            self.comments
                .set_error(StoreError::validation("Sign in to comment"));
            return false;
        };

        if !self.comments.add(post_id, &author, text).await {
            return false;
        }
        self.posts.record_comment(post_id);
        true
    }

    /// Fetch the feed, notifications and conversations. Returns true when
    /// every fetch succeeded.
    pub async fn refresh_all(&mut self) -> bool {
        let posts = self.posts.fetch().await;
        let notifications = self.notifications.fetch().await;
        let messages = self.messages.fetch().await;
        log_debug!(
            self.log_config,
            "refresh_all: posts={} notifications={} messages={}",
            posts,
            notifications,
            messages
        );
        posts && notifications && messages
    }
}
