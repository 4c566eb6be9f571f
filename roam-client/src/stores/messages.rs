use std::sync::Arc;

use roam_types::{Conversation, SendMessageRequest};

use super::{Collection, Domain, DomainStatus, FetchTicket, RequestSequence, StoreContext, StoreError};
use crate::api::ApiResult;
use crate::{log_api_call, log_fetch, log_mutation};

/// Time label given to a conversation that just received a message
pub const JUST_NOW_LABEL: &str = "now";

/// Conversation summaries, most recent activity first
pub struct MessageStore {
    ctx: StoreContext,
    conversations: Collection<Conversation>,
    unread_count: usize,
    status: DomainStatus,
    sequence: RequestSequence,
}

impl MessageStore {
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            ctx,
            conversations: Collection::default(),
            unread_count: 0,
            status: DomainStatus::default(),
            sequence: RequestSequence::default(),
        }
    }

    pub fn conversations(&self) -> &Collection<Conversation> {
        &self.conversations
    }

    pub fn status(&self) -> &DomainStatus {
        &self.status
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Conversation>> {
        self.conversations.get(id)
    }

    /// Total unread messages across all conversations
    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    fn set_conversations(&mut self, conversations: Collection<Conversation>) {
        self.unread_count = conversations
            .iter()
            .map(|c| c.unread_count as usize)
            .sum();
        self.conversations = conversations;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.status.start_loading();
        self.sequence.issue()
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: ApiResult<Vec<Conversation>>,
    ) -> bool {
        if !self.sequence.is_latest(ticket) {
            log_fetch!(self.ctx.log, "messages: dropping stale fetch {:?}", ticket);
            return false;
        }

        match result {
            Ok(conversations) => {
                self.set_conversations(Collection::new(conversations));
                self.status.finish(None);
                true
            }
            Err(e) => {
                self.status
                    .finish(Some(StoreError::backend("Messages could not be fetched", &e)));
                false
            }
        }
    }

    pub async fn fetch(&mut self) -> bool {
        let ticket = self.begin_fetch();
        log_api_call!(self.ctx.log, "list_conversations");
        let result = self.ctx.client.list_conversations().await;
        self.complete_fetch(ticket, result)
    }

    /// Clear the unread count of one conversation
    pub async fn mark_read(&mut self, id: &str) -> bool {
        self.status.error = None;

        let Some(conversation) = self.conversations.get(id) else {
            self.status.error = self.ctx.policy.resolve(Domain::Messages, id);
            return false;
        };
        if conversation.unread_count == 0 {
            return false;
        }

        let updated = Conversation {
            unread_count: 0,
            ..Conversation::clone(conversation)
        };
        let snapshot = self.conversations.clone();
        self.set_conversations(self.conversations.replaced(id, updated));
        log_mutation!(self.ctx.log, "messages: conversation {} marked read", id);

        match self.ctx.client.mark_conversation_read(id).await {
            Ok(()) => true,
            Err(e) => {
                self.set_conversations(snapshot);
                self.status.error = Some(StoreError::backend("Could not mark message as read", &e));
                false
            }
        }
    }

    /// Send a message to a counterpart with an existing conversation
    pub async fn send_message(&mut self, counterpart_id: &str, content: &str) -> bool {
        self.status.error = None;

        let content = content.trim();
        if content.is_empty() {
            self.status.error = Some(StoreError::validation("Message cannot be empty"));
            return false;
        }

        let Some(conversation) = self
            .conversations
            .iter()
            .find(|c| c.counterpart.id == counterpart_id)
        else {
            self.status.error = self.ctx.policy.resolve(Domain::Messages, counterpart_id);
            return false;
        };

        let conversation_id = conversation.id.clone();
        let updated = Conversation {
            last_message: content.to_string(),
            time: JUST_NOW_LABEL.to_string(),
            ..Conversation::clone(conversation)
        };
        let snapshot = self.conversations.clone();
        self.set_conversations(self.conversations.promoted(&conversation_id, updated));
        log_mutation!(self.ctx.log, "messages: sent to {}", counterpart_id);

        let request = SendMessageRequest {
            to_user_id: counterpart_id.to_string(),
            content: content.to_string(),
        };
        log_api_call!(self.ctx.log, "send_message {}", counterpart_id);
        match self.ctx.client.send_message(&request).await {
            Ok(()) => true,
            Err(e) => {
                self.set_conversations(snapshot);
                self.status.error = Some(StoreError::backend("Could not send message", &e));
                false
            }
        }
    }
}
