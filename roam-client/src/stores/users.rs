use std::sync::Arc;

use roam_types::{FollowAction, UserProfile};

use super::{Collection, Domain, DomainStatus, FetchTicket, RequestSequence, StoreContext, StoreError};
use crate::api::{ApiError, ApiResult};
use crate::{log_api_call, log_fetch, log_mutation};

/// Profile cache keyed by user id, plus the profile currently on screen
pub struct UserStore {
    ctx: StoreContext,
    profiles: Collection<UserProfile>,
    current: Option<String>,
    status: DomainStatus,
    sequence: RequestSequence,
}

impl UserStore {
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            ctx,
            profiles: Collection::default(),
            current: None,
            status: DomainStatus::default(),
            sequence: RequestSequence::default(),
        }
    }

    pub fn profiles(&self) -> &Collection<UserProfile> {
        &self.profiles
    }

    pub fn status(&self) -> &DomainStatus {
        &self.status
    }

    pub fn get(&self, id: &str) -> Option<&Arc<UserProfile>> {
        self.profiles.get(id)
    }

    /// The most recently fetched profile
    pub fn current(&self) -> Option<&Arc<UserProfile>> {
        self.current.as_deref().and_then(|id| self.profiles.get(id))
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.status.start_loading();
        self.sequence.issue()
    }

    /// Apply a profile fetch result for `user_id`
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        user_id: &str,
        result: ApiResult<UserProfile>,
    ) -> bool {
        if !self.sequence.is_latest(ticket) {
            log_fetch!(self.ctx.log, "users: dropping stale fetch {:?} for {}", ticket, user_id);
            return false;
        }

        match result {
            Ok(profile) => {
                let id = profile.id.clone();
                self.profiles = if self.profiles.contains(&id) {
                    self.profiles.replaced(&id, profile)
                } else {
                    self.profiles.appended(profile)
                };
                self.current = Some(id);
                self.status.finish(None);
                true
            }
            Err(ApiError::NotFound(_)) => {
                self.status.finish(Some(StoreError::not_found(Domain::Users, user_id)));
                false
            }
            Err(e) => {
                log::warn!("User profile {} could not be fetched: {}", user_id, e);
                self.status
                    .finish(Some(StoreError::backend("User profile could not be fetched", &e)));
                false
            }
        }
    }

    pub async fn fetch_profile(&mut self, user_id: &str) -> bool {
        let ticket = self.begin_fetch();
        log_api_call!(self.ctx.log, "fetch_user_profile {}", user_id);
        let result = self.ctx.client.fetch_user_profile(user_id).await;
        self.complete_fetch(ticket, user_id, result)
    }

    pub async fn follow(&mut self, user_id: &str) -> bool {
        self.set_following(user_id, FollowAction::Follow).await
    }

    pub async fn unfollow(&mut self, user_id: &str) -> bool {
        self.set_following(user_id, FollowAction::Unfollow).await
    }

    async fn set_following(&mut self, user_id: &str, action: FollowAction) -> bool {
        self.status.error = None;

        let Some(profile) = self.profiles.get(user_id) else {
            self.status.error = self.ctx.policy.resolve(Domain::Users, user_id);
            return false;
        };
        let Some(updated) = adjust_followers(profile, action) else {
            return false;
        };

        let snapshot = self.profiles.clone();
        self.profiles = self.profiles.replaced(user_id, updated);
        log_mutation!(self.ctx.log, "users: {} {} optimistically", action.as_str(), user_id);

        match self.ctx.client.set_following(user_id, action).await {
            Ok(()) => true,
            Err(e) => {
                log_mutation!(self.ctx.log, "users: rolling back {} {}: {}", action.as_str(), user_id, e);
                self.profiles = snapshot;
                let message = match action {
                    FollowAction::Follow => "Could not follow user",
                    FollowAction::Unfollow => "Could not unfollow user",
                };
                self.status.error = Some(StoreError::backend(message, &e));
                false
            }
        }
    }
}

/// The only place `followers_count` changes
fn adjust_followers(profile: &UserProfile, action: FollowAction) -> Option<UserProfile> {
    if profile.is_following == action.following() {
        return None;
    }

    let mut updated = profile.clone();
    updated.followers_count = match action {
        FollowAction::Follow => profile.followers_count.saturating_add(1),
        FollowAction::Unfollow => profile.followers_count.saturating_sub(1),
    };
    updated.is_following = action.following();
    Some(updated)
}
