use roam_types::{LoginRequest, SessionUser};

use super::{DomainStatus, StoreContext, StoreError};
use crate::api::ApiError;
use crate::log_api_call;

/// The signed-in user
pub struct SessionStore {
    ctx: StoreContext,
    user: Option<SessionUser>,
    session_token: Option<String>,
    status: DomainStatus,
}

impl SessionStore {
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            ctx,
            user: None,
            session_token: None,
            status: DomainStatus::default(),
        }
    }

    pub fn status(&self) -> &DomainStatus {
        &self.status
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Replace the signed-in user. Clearing it also drops the session token
    /// here and in the transport.
    pub fn set_user(&mut self, user: Option<SessionUser>) {
        if user.is_none() {
            self.session_token = None;
            self.ctx.client.clear_session();
        }
        self.user = user;
    }

    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        if username.trim().is_empty() {
            self.status.error = Some(StoreError::validation("Username is required"));
            return false;
        }

        self.status.start_loading();
        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };

        log_api_call!(self.ctx.log, "login {}", request.username);
        match self.ctx.client.login(&request).await {
            Ok(response) => {
                log::info!("Signed in as {}", response.user.username);
                self.user = Some(response.user);
                self.session_token = Some(response.session_token);
                self.status.finish(None);
                true
            }
            Err(e) => {
                let error = match e {
                    ApiError::Unauthorized(_) => StoreError::validation("Invalid username or password"),
                    other => StoreError::backend("Login failed", &other),
                };
                self.status.finish(Some(error));
                false
            }
        }
    }

    /// Sign out on the backend (best effort) and forget the session locally
    pub async fn logout(&mut self) {
        log_api_call!(self.ctx.log, "logout");
        if let Err(e) = self.ctx.client.logout().await {
            log::warn!("Backend logout failed: {}", e);
        }
        self.user = None;
        self.session_token = None;
        self.status = DomainStatus::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BackendCall, FixtureBackend, FixtureOptions};
    use crate::fixtures::FixtureSet;
    use std::sync::Arc;

    fn store() -> SessionStore {
        SessionStore::new(StoreContext::new(Arc::new(FixtureBackend::seeded())))
    }

    fn store_on(backend: &Arc<FixtureBackend>) -> SessionStore {
        SessionStore::new(StoreContext::new(backend.clone()))
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let mut store = store();
        assert!(store.login("deniz", "secret").await);
        assert!(store.is_authenticated());
        assert_eq!(store.current_user().unwrap().username, "deniz");
        assert!(store.session_token().is_some());
        assert!(!store.status().loading);

        store.logout().await;
        assert!(!store.is_authenticated());
        assert!(store.session_token().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_transport_token() {
        let backend = Arc::new(FixtureBackend::seeded());
        let mut store = store_on(&backend);
        assert!(store.login("deniz", "secret").await);
        assert!(backend.session_token().is_some());

        store.logout().await;
        assert_eq!(backend.session_token(), None);
        assert_eq!(backend.call_count(BackendCall::Logout), 1);
    }

    #[tokio::test]
    async fn test_failed_backend_logout_still_signs_out() {
        let backend = Arc::new(FixtureBackend::new(
            FixtureSet::seed(),
            FixtureOptions::failing([BackendCall::Logout]),
        ));
        let mut store = store_on(&backend);
        assert!(store.login("deniz", "secret").await);

        store.logout().await;
        assert!(!store.is_authenticated());
        assert_eq!(backend.session_token(), None);
        assert!(store.status().error.is_none());
    }

    #[tokio::test]
    async fn test_clearing_user_drops_tokens() {
        let backend = Arc::new(FixtureBackend::seeded());
        let mut store = store_on(&backend);
        assert!(store.login("deniz", "secret").await);

        store.set_user(None);
        assert!(!store.is_authenticated());
        assert!(store.session_token().is_none());
        assert_eq!(backend.session_token(), None);
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let mut store = store();
        assert!(!store.login("deniz", "").await);
        assert!(!store.is_authenticated());
        assert_eq!(
            store.status().error_message().as_deref(),
            Some("Invalid username or password")
        );
        assert!(!store.status().loading);
    }

    #[tokio::test]
    async fn test_blank_username_is_rejected_locally() {
        let mut store = store();
        assert!(!store.login("  ", "secret").await);
        assert!(matches!(store.status().error, Some(StoreError::Validation(_))));
    }
}
