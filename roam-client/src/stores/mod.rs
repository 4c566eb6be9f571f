//! Per-domain state stores.
//!
//! Every store owns one collection plus a [`DomainStatus`]. Mutations never
//! edit an entity in place: the store builds a new [`Collection`] in which
//! touched entities are fresh `Arc`s and untouched ones are shared with the
//! previous collection, so consumers can detect change with `Arc::ptr_eq`.
//!
//! Operations never return errors. Failures land in the domain's
//! `status().error`; mutating operations return whether their change was
//! applied and kept.

mod collection;
mod comments;
mod messages;
mod notifications;
mod posts;
mod session;
mod users;

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::api::{ApiError, BackendClient};
use crate::logging::LogConfig;

pub use collection::{Collection, Entity};
pub use comments::CommentStore;
pub use messages::MessageStore;
pub use notifications::NotificationStore;
pub use posts::{PostDraft, PostStore};
pub use session::SessionStore;
pub use users::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Posts,
    Users,
    Notifications,
    Messages,
    Comments,
    Session,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Posts => "post",
            Domain::Users => "user",
            Domain::Notifications => "notification",
            Domain::Messages => "conversation",
            Domain::Comments => "comment",
            Domain::Session => "session",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("No {} with id {id}", .domain.as_str())]
    NotFound { domain: Domain, id: String },

    #[error("{action}: {reason}")]
    Backend { action: String, reason: String },
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }

    pub fn not_found(domain: Domain, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            domain,
            id: id.into(),
        }
    }

    pub fn backend(action: impl Into<String>, err: &ApiError) -> Self {
        StoreError::Backend {
            action: action.into(),
            reason: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// What a toggle or mark-read does when the target id is not in the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingEntityPolicy {
    /// Leave everything unchanged and report nothing
    #[default]
    Ignore,
    /// Leave the collection unchanged and set a not-found error
    Report,
}

impl MissingEntityPolicy {
    /// The error to surface for a missing id, if any
    pub fn resolve(&self, domain: Domain, id: &str) -> Option<StoreError> {
        match self {
            MissingEntityPolicy::Ignore => None,
            MissingEntityPolicy::Report => Some(StoreError::not_found(domain, id)),
        }
    }
}

/// Loading and error flags of one domain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainStatus {
    pub loading: bool,
    pub error: Option<StoreError>,
}

impl DomainStatus {
    fn start_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self, error: Option<StoreError>) {
        self.loading = false;
        self.error = error;
    }

    /// The user-facing error message, if any
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|err| err.to_string())
    }
}

/// Identifies one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Monotonic fetch counter. Only the most recently issued ticket may complete.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn issue(&mut self) -> FetchTicket {
        self.latest += 1;
        FetchTicket(self.latest)
    }

    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest
    }
}

/// Collaborators shared by every store
#[derive(Clone)]
pub struct StoreContext {
    pub client: Arc<dyn BackendClient>,
    pub policy: MissingEntityPolicy,
    pub log: LogConfig,
}

impl StoreContext {
    pub fn new(client: Arc<dyn BackendClient>) -> Self {
        Self {
            client,
            policy: MissingEntityPolicy::default(),
            log: LogConfig::disabled(),
        }
    }

    pub fn with_policy(mut self, policy: MissingEntityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}
