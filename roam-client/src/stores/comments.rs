use std::collections::HashMap;

use roam_types::{AuthorRef, Comment, CreateCommentRequest};
use uuid::Uuid;

use super::{Collection, DomainStatus, FetchTicket, RequestSequence, StoreContext, StoreError};
use crate::api::ApiResult;
use crate::{log_api_call, log_fetch, log_mutation};

/// Comment threads keyed by post id. Threads read oldest first.
///
/// Each thread has its own fetch sequence, so loading one post's comments
/// never supersedes a fetch for another post.
pub struct CommentStore {
    ctx: StoreContext,
    threads: HashMap<String, Collection<Comment>>,
    status: DomainStatus,
    sequences: HashMap<String, RequestSequence>,
}

impl CommentStore {
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            ctx,
            threads: HashMap::new(),
            status: DomainStatus::default(),
            sequences: HashMap::new(),
        }
    }

    pub fn status(&self) -> &DomainStatus {
        &self.status
    }

    pub(crate) fn set_error(&mut self, error: StoreError) {
        self.status.error = Some(error);
    }

    /// The thread for a post; empty when nothing was loaded yet
    pub fn thread(&self, post_id: &str) -> Collection<Comment> {
        self.threads.get(post_id).cloned().unwrap_or_default()
    }

    pub fn begin_fetch(&mut self, post_id: &str) -> FetchTicket {
        self.status.start_loading();
        self.sequences.entry(post_id.to_string()).or_default().issue()
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        post_id: &str,
        result: ApiResult<Vec<Comment>>,
    ) -> bool {
        let is_latest = self
            .sequences
            .get(post_id)
            .is_some_and(|sequence| sequence.is_latest(ticket));
        if !is_latest {
            log_fetch!(self.ctx.log, "comments: dropping stale fetch {:?} for {}", ticket, post_id);
            return false;
        }

        match result {
            Ok(comments) => {
                self.threads
                    .insert(post_id.to_string(), Collection::new(comments));
                self.status.finish(None);
                true
            }
            Err(e) => {
                self.status
                    .finish(Some(StoreError::backend("Comments could not be fetched", &e)));
                false
            }
        }
    }

    pub async fn fetch(&mut self, post_id: &str) -> bool {
        let ticket = self.begin_fetch(post_id);
        log_api_call!(self.ctx.log, "list_comments {}", post_id);
        let result = self.ctx.client.list_comments(post_id).await;
        self.complete_fetch(ticket, post_id, result)
    }

    /// Append a comment to a post's thread
    pub async fn add(&mut self, post_id: &str, author: &AuthorRef, text: &str) -> bool {
        self.status.error = None;

        let text = text.trim();
        if text.is_empty() {
            self.status.error = Some(StoreError::validation("Comment cannot be empty"));
            return false;
        }

        let local_id = Uuid::new_v4().to_string();
        let optimistic = Comment {
            id: local_id.clone(),
            post_id: post_id.to_string(),
            author_id: author.id.clone(),
            username: author.username.clone(),
            text: text.to_string(),
            time: "now".to_string(),
        };

        let snapshot = self.thread(post_id);
        self.threads
            .insert(post_id.to_string(), snapshot.appended(optimistic));
        log_mutation!(self.ctx.log, "comments: added {} to {}", local_id, post_id);

        let request = CreateCommentRequest {
            text: text.to_string(),
        };
        match self.ctx.client.create_comment(post_id, author, &request).await {
            Ok(confirmed) => {
                let thread = self.thread(post_id).replaced(&local_id, confirmed);
                self.threads.insert(post_id.to_string(), thread);
                true
            }
            Err(e) => {
                log_mutation!(self.ctx.log, "comments: rolling back {}: {}", local_id, e);
                self.threads.insert(post_id.to_string(), snapshot);
                self.status.error = Some(StoreError::backend("Comment could not be added", &e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BackendCall, FixtureBackend, FixtureOptions};
    use crate::fixtures::FixtureSet;
    use std::sync::Arc;

    fn author() -> AuthorRef {
        AuthorRef {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            username: "johndoe".to_string(),
            profile_image: None,
        }
    }

    fn store(options: FixtureOptions) -> CommentStore {
        let backend = FixtureBackend::new(FixtureSet::seed(), options);
        CommentStore::new(StoreContext::new(Arc::new(backend)))
    }

    #[tokio::test]
    async fn test_add_appends_to_thread() {
        let mut store = store(FixtureOptions::default());
        store.fetch("1").await;
        assert_eq!(store.thread("1").len(), 2);

        assert!(store.add("1", &author(), "  Lovely  ").await);
        let thread = store.thread("1");
        assert_eq!(thread.len(), 3);
        let last = thread.iter().last().unwrap();
        assert_eq!(last.text, "Lovely");
        assert_eq!(last.username, "johndoe");
    }

    #[tokio::test]
    async fn test_blank_comment_is_rejected() {
        let mut store = store(FixtureOptions::default());
        assert!(!store.add("1", &author(), " ").await);
        assert!(store.thread("1").is_empty());
        assert!(store.status().error.is_some());
    }

    #[tokio::test]
    async fn test_failed_add_rolls_back() {
        let mut store = store(FixtureOptions::failing([BackendCall::CreateComment]));
        store.fetch("1").await;
        let before = store.thread("1");
        assert!(!store.add("1", &author(), "hi").await);
        assert!(store.thread("1").same_as(&before));
        assert!(store.status().error.is_some());
    }

    #[test]
    fn test_stale_thread_fetch_is_discarded() {
        let mut store = store(FixtureOptions::default());
        let older = store.begin_fetch("1");
        let newer = store.begin_fetch("1");

        assert!(store.complete_fetch(newer, "1", Ok(Vec::new())));
        let late = FixtureSet::seed().comments;
        assert!(!store.complete_fetch(older, "1", Ok(late)));
        assert!(store.thread("1").is_empty());
        assert!(!store.status().loading);
    }

    #[test]
    fn test_threads_fetch_independently() {
        let mut store = store(FixtureOptions::default());
        let first = store.begin_fetch("1");
        let second = store.begin_fetch("2");

        assert!(store.complete_fetch(second, "2", Ok(Vec::new())));
        let comments = FixtureSet::seed().comments;
        assert!(store.complete_fetch(first, "1", Ok(comments)));
        assert_eq!(store.thread("1").len(), 2);
    }

    #[test]
    fn test_ticket_for_unknown_thread_is_rejected() {
        let mut store = store(FixtureOptions::default());
        let ticket = store.begin_fetch("1");
        assert!(!store.complete_fetch(ticket, "2", Ok(Vec::new())));
    }
}
