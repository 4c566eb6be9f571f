use std::sync::Arc;

use chrono::Utc;
use roam_types::{AuthorRef, CreatePostRequest, LikeAction, Post, PostImage};
use uuid::Uuid;

use super::{Collection, Domain, DomainStatus, FetchTicket, RequestSequence, StoreContext, StoreError};
use crate::api::ApiResult;
use crate::{log_api_call, log_fetch, log_mutation};

/// Input for a new post
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub author: AuthorRef,
    pub content: String,
    /// Image urls in display order
    pub images: Vec<String>,
    pub tagged_users: Vec<AuthorRef>,
    pub community_id: Option<String>,
}

impl PostDraft {
    pub fn new(author: AuthorRef, content: impl Into<String>) -> Self {
        Self {
            author,
            content: content.into(),
            images: Vec::new(),
            tagged_users: Vec::new(),
            community_id: None,
        }
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }
}

/// Feed state: posts newest first
pub struct PostStore {
    ctx: StoreContext,
    posts: Collection<Post>,
    status: DomainStatus,
    sequence: RequestSequence,
}

impl PostStore {
    pub fn new(ctx: StoreContext) -> Self {
        Self::with_posts(ctx, Vec::new())
    }

    /// Store pre-populated with the given posts
    pub fn with_posts(ctx: StoreContext, posts: Vec<Post>) -> Self {
        Self {
            ctx,
            posts: Collection::new(posts),
            status: DomainStatus::default(),
            sequence: RequestSequence::default(),
        }
    }

    pub fn posts(&self) -> &Collection<Post> {
        &self.posts
    }

    pub fn status(&self) -> &DomainStatus {
        &self.status
    }

    pub(crate) fn set_error(&mut self, error: StoreError) {
        self.status.error = Some(error);
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Post>> {
        self.posts.get(id)
    }

    /// Start a fetch; pair with [`PostStore::complete_fetch`]
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.status.start_loading();
        let ticket = self.sequence.issue();
        log_fetch!(self.ctx.log, "posts: fetch {:?} started", ticket);
        ticket
    }

    /// Apply a fetch result. Returns false when the ticket was superseded by
    /// a newer fetch, in which case nothing is touched.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: ApiResult<Vec<Post>>) -> bool {
        if !self.sequence.is_latest(ticket) {
            log_fetch!(self.ctx.log, "posts: dropping stale fetch {:?}", ticket);
            return false;
        }

        match result {
            Ok(posts) => {
                log_fetch!(self.ctx.log, "posts: fetch {:?} loaded {} posts", ticket, posts.len());
                self.posts = Collection::new(posts);
                self.status.finish(None);
                true
            }
            Err(e) => {
                log::warn!("Posts could not be fetched: {}", e);
                self.status
                    .finish(Some(StoreError::backend("Posts could not be fetched", &e)));
                false
            }
        }
    }

    /// Replace the feed with the backend's posts
    pub async fn fetch(&mut self) -> bool {
        let ticket = self.begin_fetch();
        log_api_call!(self.ctx.log, "list_posts");
        let result = self.ctx.client.list_posts().await;
        self.complete_fetch(ticket, result)
    }

    /// Create a post and put it at the top of the feed
    pub async fn create(&mut self, draft: PostDraft) -> bool {
        self.status.error = None;

        let content = draft.content.trim().to_string();
        if content.is_empty() {
            self.status.error = Some(StoreError::validation("Post content cannot be empty"));
            return false;
        }

        let now = Utc::now();
        let local_id = Uuid::new_v4().to_string();
        let optimistic = Post {
            id: local_id.clone(),
            author: draft.author.clone(),
            content: content.clone(),
            images: PostImage::from_urls(draft.images.iter().cloned()),
            likes_count: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
            viewer_has_liked: false,
        };

        let snapshot = self.posts.clone();
        self.posts = self.posts.prepended(optimistic);
        log_mutation!(self.ctx.log, "posts: created {} optimistically", local_id);

        let request = CreatePostRequest {
            content,
            images: draft.images,
            tagged_user_ids: draft.tagged_users.into_iter().map(|user| user.id).collect(),
            community_id: draft.community_id,
        };

        log_api_call!(self.ctx.log, "create_post");
        match self.ctx.client.create_post(&draft.author, &request).await {
            Ok(confirmed) => {
                log_mutation!(self.ctx.log, "posts: {} confirmed as {}", local_id, confirmed.id);
                self.posts = self.posts.replaced(&local_id, confirmed);
                true
            }
            Err(e) => {
                log_mutation!(self.ctx.log, "posts: rolling back create {}: {}", local_id, e);
                self.posts = snapshot;
                self.status.error = Some(StoreError::backend("Post could not be created", &e));
                false
            }
        }
    }

    pub async fn like(&mut self, id: &str) -> bool {
        self.set_liked(id, LikeAction::Like).await
    }

    pub async fn unlike(&mut self, id: &str) -> bool {
        self.set_liked(id, LikeAction::Unlike).await
    }

    async fn set_liked(&mut self, id: &str, action: LikeAction) -> bool {
        self.status.error = None;

        let Some(post) = self.posts.get(id) else {
            self.status.error = self.ctx.policy.resolve(Domain::Posts, id);
            return false;
        };

        // Repeating the current state is silently ignored
        let Some(updated) = adjust_likes(post, action) else {
            return false;
        };

        let snapshot = self.posts.clone();
        self.posts = self.posts.replaced(id, updated);
        log_mutation!(self.ctx.log, "posts: {} {} optimistically", action.as_str(), id);

        log_api_call!(self.ctx.log, "set_post_like {} {}", id, action.as_str());
        match self.ctx.client.set_post_like(id, action).await {
            Ok(()) => true,
            Err(e) => {
                log_mutation!(self.ctx.log, "posts: rolling back {} {}: {}", action.as_str(), id, e);
                self.posts = snapshot;
                let message = match action {
                    LikeAction::Like => "Could not like post",
                    LikeAction::Unlike => "Could not unlike post",
                };
                self.status.error = Some(StoreError::backend(message, &e));
                false
            }
        }
    }

    /// Count one more comment on a post. Local only; the comment itself was
    /// already accepted by the backend.
    pub fn record_comment(&mut self, id: &str) -> bool {
        self.status.error = None;

        let Some(post) = self.posts.get(id) else {
            self.status.error = self.ctx.policy.resolve(Domain::Posts, id);
            return false;
        };

        let updated = adjust_comments(post, 1);
        self.posts = self.posts.replaced(id, updated);
        true
    }
}

/// The only place `likes_count` changes. `None` when the post is already in
/// the requested state.
fn adjust_likes(post: &Post, action: LikeAction) -> Option<Post> {
    if post.viewer_has_liked == action.liked() {
        return None;
    }

    let mut updated = post.clone();
    updated.likes_count = match action {
        LikeAction::Like => post.likes_count.saturating_add(1),
        LikeAction::Unlike => post.likes_count.saturating_sub(1),
    };
    updated.viewer_has_liked = action.liked();
    Some(updated)
}

/// The only place `comments_count` changes
fn adjust_comments(post: &Post, delta: i64) -> Post {
    let mut updated = post.clone();
    let count = i64::from(post.comments_count) + delta;
    updated.comments_count = count.clamp(0, i64::from(u32::MAX)) as u32;
    updated
}
