use std::sync::Arc;

use roam_types::Notification;

use super::{Collection, Domain, DomainStatus, FetchTicket, RequestSequence, StoreContext, StoreError};
use crate::api::ApiResult;
use crate::{log_api_call, log_fetch, log_mutation};

pub struct NotificationStore {
    ctx: StoreContext,
    notifications: Collection<Notification>,
    unread_count: usize,
    status: DomainStatus,
    sequence: RequestSequence,
}

impl NotificationStore {
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            ctx,
            notifications: Collection::default(),
            unread_count: 0,
            status: DomainStatus::default(),
            sequence: RequestSequence::default(),
        }
    }

    pub fn notifications(&self) -> &Collection<Notification> {
        &self.notifications
    }

    pub fn status(&self) -> &DomainStatus {
        &self.status
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Notification>> {
        self.notifications.get(id)
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    /// Swap in a new collection and recount unread entries from it
    fn set_notifications(&mut self, notifications: Collection<Notification>) {
        self.unread_count = notifications.iter().filter(|n| !n.is_read).count();
        self.notifications = notifications;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.status.start_loading();
        self.sequence.issue()
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: ApiResult<Vec<Notification>>,
    ) -> bool {
        if !self.sequence.is_latest(ticket) {
            log_fetch!(self.ctx.log, "notifications: dropping stale fetch {:?}", ticket);
            return false;
        }

        match result {
            Ok(notifications) => {
                self.set_notifications(Collection::new(notifications));
                self.status.finish(None);
                true
            }
            Err(e) => {
                self.status.finish(Some(StoreError::backend(
                    "Notifications could not be fetched",
                    &e,
                )));
                false
            }
        }
    }

    pub async fn fetch(&mut self) -> bool {
        let ticket = self.begin_fetch();
        log_api_call!(self.ctx.log, "list_notifications");
        let result = self.ctx.client.list_notifications().await;
        self.complete_fetch(ticket, result)
    }

    pub async fn mark_read(&mut self, id: &str) -> bool {
        self.status.error = None;

        let Some(notification) = self.notifications.get(id) else {
            self.status.error = self.ctx.policy.resolve(Domain::Notifications, id);
            return false;
        };
        if notification.is_read {
            return false;
        }

        let updated = Notification {
            is_read: true,
            ..Notification::clone(notification)
        };
        let snapshot = self.notifications.clone();
        self.set_notifications(self.notifications.replaced(id, updated));
        log_mutation!(self.ctx.log, "notifications: {} marked read", id);

        match self.ctx.client.mark_notification_read(id).await {
            Ok(()) => true,
            Err(e) => {
                self.set_notifications(snapshot);
                self.status.error = Some(StoreError::backend(
                    "Could not mark notification as read",
                    &e,
                ));
                false
            }
        }
    }

    pub async fn mark_all_read(&mut self) -> bool {
        self.status.error = None;

        let snapshot = self.notifications.clone();
        self.set_notifications(self.notifications.updated_all(|n| {
            (!n.is_read).then(|| Notification {
                is_read: true,
                ..n.clone()
            })
        }));
        log_mutation!(self.ctx.log, "notifications: all marked read");

        match self.ctx.client.mark_all_notifications_read().await {
            Ok(()) => true,
            Err(e) => {
                self.set_notifications(snapshot);
                self.status.error = Some(StoreError::backend(
                    "Could not mark all notifications as read",
                    &e,
                ));
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

    async fn fetched(options: FixtureOptions) -> NotificationStore {
        let backend = FixtureBackend::new(FixtureSet::seed(), options);
        let mut store = NotificationStore::new(StoreContext::new(Arc::new(backend)));
        store.fetch().await;
        store
    }

    #[tokio::test]
    async fn test_fetch_counts_unread() {
        let store = fetched(FixtureOptions::default()).await;
        assert_eq!(store.notifications().len(), 3);
        assert_eq!(store.unread_count(), 2);
        assert!(!store.status().loading);
    }

    #[tokio::test]
    async fn test_mark_read_recounts() {
        let mut store = fetched(FixtureOptions::default()).await;
        let untouched = Arc::clone(store.get("2").unwrap());

        assert!(store.mark_read("1").await);
        assert!(store.get("1").unwrap().is_read);
        assert_eq!(store.unread_count(), 1);
        assert!(Arc::ptr_eq(store.get("2").unwrap(), &untouched));

        assert!(!store.mark_read("1").await);
        assert_eq!(store.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_mark_all_read_zeroes_unread() {
        let mut store = fetched(FixtureOptions::default()).await;
        let already_read = Arc::clone(store.get("3").unwrap());

        assert!(store.mark_all_read().await);
        assert_eq!(store.unread_count(), 0);
        assert_eq!(store.notifications().iter().filter(|n| !n.is_read).count(), 0);
        assert!(Arc::ptr_eq(store.get("3").unwrap(), &already_read));
    }

    #[tokio::test]
    async fn test_failed_mark_all_read_rolls_back() {
        let mut store = fetched(FixtureOptions::failing([BackendCall::MarkAllNotificationsRead])).await;
        assert!(!store.mark_all_read().await);
        assert_eq!(store.unread_count(), 2);
        assert!(store.status().error.is_some());
    }

    #[tokio::test]
    async fn test_failed_fetch_clears_loading() {
        let store = fetched(FixtureOptions::failing([BackendCall::ListNotifications])).await;
        assert!(!store.status().loading);
        assert!(store.notifications().is_empty());
        assert_eq!(
            store.status().error_message().unwrap(),
            "Notifications could not be fetched: ListNotifications failed"
        );
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let backend = FixtureBackend::seeded();
        let mut store = NotificationStore::new(StoreContext::new(Arc::new(backend)));
        let older = store.begin_fetch();
        let newer = store.begin_fetch();

        assert!(store.complete_fetch(newer, Ok(Vec::new())));
        assert!(!store.complete_fetch(older, Ok(FixtureSet::seed().notifications)));
        assert!(store.notifications().is_empty());
        assert_eq!(store.unread_count(), 0);
        assert!(!store.status().loading);
    }

    #[tokio::test]
    async fn test_failed_mark_read_rolls_back() {
        let mut store = fetched(FixtureOptions::failing([BackendCall::MarkNotificationRead])).await;
        let before = store.notifications().clone();

        assert!(!store.mark_read("1").await);
        assert!(store.notifications().same_as(&before));
        assert!(!store.get("1").unwrap().is_read);
        assert_eq!(store.unread_count(), 2);
        assert!(store.status().error.is_some());
    }
}
