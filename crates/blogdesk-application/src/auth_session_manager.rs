//! Auth session manager.
//!
//! Owns the in-memory [`Session`] for the lifetime of the process and keeps
//! it in step with the [`SessionStore`]. Consumers read snapshots through
//! [`AuthSessionManager::current_session`] or follow changes through
//! [`AuthSessionManager::subscribe`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use blogdesk_core::auth::{AuthApi, AuthError, AuthResponse, LoginCredentials, RegisterProfile};
use blogdesk_core::session::{Session, SessionStore};
use tokio::sync::{Mutex, watch};

/// Coordinates login, registration and logout against the API and the store.
///
/// # Concurrency
///
/// The session lives in a `watch` channel and is only ever replaced as a
/// whole `Arc<Session>`, so readers see either the old or the new value.
/// Nothing is published while a request is in flight. Publishing and
/// persisting happen under one lock, so the stored value follows the same
/// order as the published one.
pub struct AuthSessionManager {
    store: Arc<dyn SessionStore>,
    api: Arc<dyn AuthApi>,
    sender: watch::Sender<Arc<Session>>,
    initialized: AtomicBool,
    update_lock: Mutex<()>,
}

impl AuthSessionManager {
    pub fn new(store: Arc<dyn SessionStore>, api: Arc<dyn AuthApi>) -> Self {
        let (sender, _) = watch::channel(Arc::new(Session::unauthenticated()));
        Self {
            store,
            api,
            sender,
            initialized: AtomicBool::new(false),
            update_lock: Mutex::new(()),
        }
    }

    /// Restores the persisted session and publishes it.
    ///
    /// Runs once per process; the store decides what an empty or corrupt
    /// state means (always an unauthenticated session). No network access.
    ///
    /// # Errors
    ///
    /// `AuthError::AlreadyInitialized` on a second call.
    pub async fn initialize(&self) -> Result<Arc<Session>, AuthError> {
        if self
            .initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AuthError::AlreadyInitialized);
        }

        let _guard = self.update_lock.lock().await;
        let session = Arc::new(self.store.load().await);
        tracing::info!(
            "[AuthSession] Restored session (authenticated: {}, permissions: {})",
            session.is_authenticated(),
            session.permissions().len()
        );
        self.sender.send_replace(Arc::clone(&session));
        Ok(session)
    }

    /// Logs in and adopts the returned session.
    ///
    /// On any failure the current session is left untouched.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Arc<Session>, AuthError> {
        self.ensure_initialized()?;
        let result = self.api.login(credentials).await;
        self.adopt("login", result).await
    }

    /// Registers a new account and logs it in, with the same contract as
    /// [`AuthSessionManager::login`].
    pub async fn register(&self, profile: &RegisterProfile) -> Result<Arc<Session>, AuthError> {
        self.ensure_initialized()?;
        let result = self.api.register(profile).await;
        self.adopt("register", result).await
    }

    /// Drops the current session and clears the store. Local only; never
    /// fails.
    pub async fn logout(&self) {
        let _guard = self.update_lock.lock().await;
        self.sender
            .send_replace(Arc::new(Session::unauthenticated()));

        if let Err(e) = self.store.clear().await {
            tracing::warn!("[AuthSession] Failed to clear persisted session: {}", e);
        }
        tracing::info!("[AuthSession] Logged out");
    }

    pub fn current_session(&self) -> Arc<Session> {
        self.sender.borrow().clone()
    }

    /// Receiver notified on every session replacement. The current value is
    /// available immediately through `borrow()`.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Session>> {
        self.sender.subscribe()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    fn ensure_initialized(&self) -> Result<(), AuthError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(AuthError::NotInitialized)
        }
    }

    async fn adopt(
        &self,
        operation: &str,
        result: Result<AuthResponse, AuthError>,
    ) -> Result<Arc<Session>, AuthError> {
        let session = match result.and_then(AuthResponse::into_session) {
            Ok(session) => Arc::new(session),
            Err(e) => {
                tracing::warn!("[AuthSession] {} failed: {}", operation, e);
                return Err(e);
            }
        };

        let _guard = self.update_lock.lock().await;
        self.sender.send_replace(Arc::clone(&session));
        tracing::info!(
            "[AuthSession] {} succeeded ({} permissions)",
            operation,
            session.permissions().len()
        );

        if let Err(e) = self.store.save(&session).await {
            tracing::warn!(
                "[AuthSession] Session adopted but could not be persisted: {}",
                e
            );
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blogdesk_core::error::{BlogdeskError, Result};
    use blogdesk_core::permission::{has_permission, MANAGE_POSTS};
    use blogdesk_core::session::UserIdentity;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct MockStore {
        stored: StdMutex<Option<Session>>,
        fail_writes: bool,
    }

    impl MockStore {
        fn with(session: Session) -> Self {
            Self {
                stored: StdMutex::new(Some(session)),
                fail_writes: false,
            }
        }

        fn failing() -> Self {
            Self {
                stored: StdMutex::new(None),
                fail_writes: true,
            }
        }

        fn stored(&self) -> Option<Session> {
            self.stored.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SessionStore for MockStore {
        async fn save(&self, session: &Session) -> Result<()> {
            if self.fail_writes {
                return Err(BlogdeskError::io("disk full"));
            }
            *self.stored.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        async fn load(&self) -> Session {
            self.stored().unwrap_or_default()
        }

        async fn clear(&self) -> Result<()> {
            if self.fail_writes {
                return Err(BlogdeskError::io("read-only"));
            }
            *self.stored.lock().unwrap() = None;
            Ok(())
        }
    }

    /// Answers every call with a fixed result.
    struct MockApi {
        answer: std::result::Result<serde_json::Value, AuthError>,
    }

    impl MockApi {
        fn ok(body: serde_json::Value) -> Self {
            Self { answer: Ok(body) }
        }

        fn err(error: AuthError) -> Self {
            Self { answer: Err(error) }
        }

        fn respond(&self) -> std::result::Result<AuthResponse, AuthError> {
            self.answer
                .clone()
                .map(|body| serde_json::from_value(body).unwrap())
        }
    }

    #[async_trait]
    impl AuthApi for MockApi {
        async fn login(
            &self,
            _credentials: &LoginCredentials,
        ) -> std::result::Result<AuthResponse, AuthError> {
            self.respond()
        }

        async fn register(
            &self,
            _profile: &RegisterProfile,
        ) -> std::result::Result<AuthResponse, AuthError> {
            self.respond()
        }
    }

    /// Holds every login until released.
    struct GatedApi {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl AuthApi for GatedApi {
        async fn login(
            &self,
            _credentials: &LoginCredentials,
        ) -> std::result::Result<AuthResponse, AuthError> {
            self.gate.notified().await;
            Ok(serde_json::from_value(json!({"token": "T2"})).unwrap())
        }

        async fn register(
            &self,
            _profile: &RegisterProfile,
        ) -> std::result::Result<AuthResponse, AuthError> {
            Err(AuthError::transport("unused"))
        }
    }

    fn existing_session() -> Session {
        Session::authenticated("T0", UserIdentity::new("Ada", "ada@example.com"), ["manage users"])
            .unwrap()
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials::new("ada@example.com", "pw")
    }

    async fn manager(store: Arc<MockStore>, api: MockApi) -> AuthSessionManager {
        let manager = AuthSessionManager::new(store, Arc::new(api));
        manager.initialize().await.unwrap();
        manager
    }

    #[tokio::test]
    async fn test_initialize_publishes_stored_session() {
        let store = Arc::new(MockStore::with(existing_session()));
        let manager = AuthSessionManager::new(store, Arc::new(MockApi::ok(json!({}))));

        assert!(!manager.current_session().is_authenticated());
        let session = manager.initialize().await.unwrap();

        assert_eq!(session.token(), Some("T0"));
        assert_eq!(*manager.current_session(), existing_session());
    }

    #[tokio::test]
    async fn test_initialize_twice_fails() {
        let manager = manager(Arc::new(MockStore::default()), MockApi::ok(json!({}))).await;
        assert_eq!(manager.initialize().await, Err(AuthError::AlreadyInitialized));
    }

    #[tokio::test]
    async fn test_login_before_initialize_fails() {
        let manager = AuthSessionManager::new(
            Arc::new(MockStore::default()),
            Arc::new(MockApi::ok(json!({"token": "T1"}))),
        );
        assert_eq!(
            manager.login(&credentials()).await,
            Err(AuthError::NotInitialized)
        );
    }

    #[tokio::test]
    async fn test_login_adopts_and_persists_session() {
        let store = Arc::new(MockStore::default());
        let manager = manager(
            Arc::clone(&store),
            MockApi::ok(json!({"token": "T1", "permission": ["manage posts"]})),
        )
        .await;

        let session = manager.login(&credentials()).await.unwrap();

        assert_eq!(session.token(), Some("T1"));
        assert!(has_permission(&manager.current_session(), MANAGE_POSTS));
        assert_eq!(store.stored().as_ref(), Some(session.as_ref()));
    }

    #[tokio::test]
    async fn test_register_logs_in() {
        let store = Arc::new(MockStore::default());
        let manager = manager(
            Arc::clone(&store),
            MockApi::ok(json!({"token": "T5", "name": "Ada", "permissions": []})),
        )
        .await;

        let session = manager
            .register(&RegisterProfile::new("Ada", "ada@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(session.token(), Some("T5"));
        assert!(session.permissions().is_empty());
        assert!(store.stored().is_some());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_unchanged() {
        let store = Arc::new(MockStore::with(existing_session()));
        let manager = manager(
            Arc::clone(&store),
            MockApi::err(AuthError::rejected(401, "Invalid credentials")),
        )
        .await;
        let before = manager.current_session();

        let result = manager.login(&credentials()).await;

        assert_eq!(result, Err(AuthError::rejected(401, "Invalid credentials")));
        assert_eq!(manager.current_session(), before);
        assert_eq!(store.stored(), Some(existing_session()));
    }

    #[tokio::test]
    async fn test_response_without_token_leaves_session_unchanged() {
        let manager = manager(
            Arc::new(MockStore::default()),
            MockApi::ok(json!({"name": "Ada"})),
        )
        .await;

        let result = manager.login(&credentials()).await;

        assert!(matches!(result, Err(AuthError::InvalidResponse(_))));
        assert!(!manager.current_session().is_authenticated());
    }

    #[tokio::test]
    async fn test_persistence_failure_still_adopts_session() {
        let manager = manager(
            Arc::new(MockStore::failing()),
            MockApi::ok(json!({"token": "T1"})),
        )
        .await;

        let session = manager.login(&credentials()).await.unwrap();
        assert_eq!(manager.current_session(), session);
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_store() {
        let store = Arc::new(MockStore::with(existing_session()));
        let manager = manager(Arc::clone(&store), MockApi::ok(json!({}))).await;

        manager.logout().await;

        let current = manager.current_session();
        assert!(!current.is_authenticated());
        assert!(current.permissions().is_empty());
        assert_eq!(store.stored(), None);
        assert_eq!(store.load().await, Session::unauthenticated());
    }

    #[tokio::test]
    async fn test_logout_succeeds_when_store_fails() {
        let manager = manager(
            Arc::new(MockStore::failing()),
            MockApi::ok(json!({"token": "T1"})),
        )
        .await;
        manager.login(&credentials()).await.unwrap();

        manager.logout().await;
        assert!(!manager.current_session().is_authenticated());
    }

    #[tokio::test]
    async fn test_subscribers_see_each_replacement() {
        let manager = manager(
            Arc::new(MockStore::default()),
            MockApi::ok(json!({"token": "T1"})),
        )
        .await;
        let mut receiver = manager.subscribe();

        manager.login(&credentials()).await.unwrap();
        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow_and_update().token(), Some("T1"));

        manager.logout().await;
        receiver.changed().await.unwrap();
        assert!(!receiver.borrow_and_update().is_authenticated());
    }

    #[tokio::test]
    async fn test_no_optimistic_update_while_login_in_flight() {
        let gate = Arc::new(Notify::new());
        let store = Arc::new(MockStore::with(existing_session()));
        let manager = Arc::new(AuthSessionManager::new(
            store,
            Arc::new(GatedApi {
                gate: Arc::clone(&gate),
            }),
        ));
        manager.initialize().await.unwrap();

        let pending = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.login(&credentials()).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(manager.current_session().token(), Some("T0"));

        gate.notify_one();
        let session = pending.await.unwrap().unwrap();
        assert_eq!(session.token(), Some("T2"));
        assert_eq!(manager.current_session().token(), Some("T2"));
    }
}
