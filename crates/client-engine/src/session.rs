//! Session store: the authenticated identity and its durable slot.

use crate::error::EngineResult;
use crate::lifecycle::OpTickets;
use crate::status::OperationStatus;
use crate::validate::{validate_login, validate_registration, LoginForm, RegistrationForm};
use blog_api::{ApiResult, BlogApiClient, Identity, LoginPayload, RegisterPayload};
use client_storage::{SlotStorage, StorageKeys, StorageResult};
use std::future::Future;
use std::sync::RwLock;

/// Durable persistence seam for the session identity.
///
/// Injected into `SessionStore` so tests can swap in an in-memory fake.
/// `load` is forgiving: malformed or unreadable data yields `None` and an
/// anonymous session rather than an error.
pub trait SessionPersistence: Send + Sync {
    /// Load the persisted identity, if present and well-formed.
    fn load(&self) -> Option<Identity>;

    /// Persist the identity, or clear the slot when `None`.
    fn save(&self, identity: Option<&Identity>) -> StorageResult<()>;
}

/// `SessionPersistence` over a `SlotStorage` backend, serializing the
/// identity as JSON under a fixed slot name.
pub struct SlotPersistence {
    storage: Box<dyn SlotStorage>,
}

impl SlotPersistence {
    /// Create a persistence layer over the given storage backend.
    pub fn new(storage: Box<dyn SlotStorage>) -> Self {
        Self { storage }
    }
}

impl SessionPersistence for SlotPersistence {
    fn load(&self) -> Option<Identity> {
        match self.storage.get(StorageKeys::SESSION_IDENTITY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    tracing::warn!(error = %e, "Malformed identity in durable slot; starting anonymous");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read durable slot; starting anonymous");
                None
            }
        }
    }

    fn save(&self, identity: Option<&Identity>) -> StorageResult<()> {
        match identity {
            Some(identity) => {
                let raw = serde_json::to_string(identity)?;
                self.storage.set(StorageKeys::SESSION_IDENTITY, &raw)
            }
            None => self.storage.delete(StorageKeys::SESSION_IDENTITY).map(|_| ()),
        }
    }
}

/// Snapshot of the session store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// The authenticated identity, or `None` for an anonymous session.
    pub identity: Option<Identity>,
    /// Status of the most recent auth operation.
    pub status: OperationStatus,
}

/// Holds the current authenticated identity (or none).
///
/// The identity is rehydrated from the durable slot at construction,
/// persisted on login/register success, and cleared on logout. All reads are
/// snapshots; no lock is held across an await.
pub struct SessionStore {
    client: BlogApiClient,
    persistence: Box<dyn SessionPersistence>,
    state: RwLock<SessionState>,
    tickets: OpTickets,
}

impl SessionStore {
    /// Create a session store, rehydrating any persisted identity.
    pub fn new(client: BlogApiClient, persistence: Box<dyn SessionPersistence>) -> Self {
        let identity = persistence.load();
        if let Some(identity) = &identity {
            tracing::debug!(username = %identity.username, "Rehydrated session from durable slot");
        }
        Self {
            client,
            persistence,
            state: RwLock::new(SessionState {
                identity,
                status: OperationStatus::idle(),
            }),
            tickets: OpTickets::default(),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.read().unwrap().clone()
    }

    /// The authenticated identity, if any.
    pub fn identity(&self) -> Option<Identity> {
        self.state.read().unwrap().identity.clone()
    }

    /// The bearer credential of the authenticated identity, if any.
    pub fn credential(&self) -> Option<String> {
        self.state
            .read()
            .unwrap()
            .identity
            .as_ref()
            .map(|i| i.token.clone())
    }

    /// Register a new account and adopt the returned identity.
    ///
    /// Validation failures return before any network call or status commit.
    pub async fn register(&self, form: &RegistrationForm) -> EngineResult<Identity> {
        validate_registration(form)?;
        let payload = RegisterPayload {
            username: form.username.trim().to_string(),
            email: form.email.clone(),
            password: form.password.clone(),
        };
        self.run_auth(self.client.register(&payload)).await
    }

    /// Log in and adopt the returned identity.
    pub async fn login(&self, form: &LoginForm) -> EngineResult<Identity> {
        validate_login(form)?;
        let payload = LoginPayload {
            email: form.email.clone(),
            password: form.password.clone(),
        };
        self.run_auth(self.client.login(&payload)).await
    }

    /// Log out: clear the durable slot and the identity.
    ///
    /// Synchronous bookkeeping, not a network lifecycle: the status resets
    /// to idle rather than succeeded/failed. Taking a ticket here means an
    /// auth call still in flight cannot resurrect the cleared identity.
    pub fn logout(&self) {
        self.tickets.issue();
        if let Err(e) = self.persistence.save(None) {
            tracing::warn!(error = %e, "Failed to clear durable slot on logout");
        }
        let mut state = self.state.write().unwrap();
        state.identity = None;
        state.status = OperationStatus::idle();
        tracing::debug!("Logged out");
    }

    /// Reset the status to idle without touching the identity.
    ///
    /// Called by presentation layers after consuming a success or error
    /// message; idempotent.
    pub fn reset_status(&self) {
        self.state.write().unwrap().status = OperationStatus::idle();
    }

    /// Shared lifecycle for register/login: commit Loading, await the call,
    /// then commit exactly one of Succeeded/Failed in a single lock write.
    async fn run_auth<F>(&self, call: F) -> EngineResult<Identity>
    where
        F: Future<Output = ApiResult<Identity>>,
    {
        let ticket = self.tickets.issue();
        self.state.write().unwrap().status = OperationStatus::loading();

        match call.await {
            Ok(identity) => {
                let mut state = self.state.write().unwrap();
                if self.tickets.is_current(ticket) {
                    if let Err(e) = self.persistence.save(Some(&identity)) {
                        tracing::warn!(error = %e, "Failed to persist session to durable slot");
                    }
                    state.identity = Some(identity.clone());
                    state.status = OperationStatus::succeeded();
                } else {
                    tracing::debug!("Discarding stale auth settlement");
                }
                Ok(identity)
            }
            Err(err) => {
                {
                    let mut state = self.state.write().unwrap();
                    if self.tickets.is_current(ticket) {
                        state.status = OperationStatus::failed(err.surface_message());
                    } else {
                        tracing::debug!("Discarding stale auth settlement");
                    }
                }
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::status::OpPhase;
    use client_storage::MemoryStorage;
    use std::sync::Arc;

    /// Storage handle the test keeps after handing a box to the store.
    struct SharedStorage(Arc<MemoryStorage>);

    impl SlotStorage for SharedStorage {
        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.0.set(key, value)
        }
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.get(key)
        }
        fn delete(&self, key: &str) -> StorageResult<bool> {
            self.0.delete(key)
        }
    }

    fn store_with_storage(base_url: &str) -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let persistence = SlotPersistence::new(Box::new(SharedStorage(storage.clone())));
        let store = SessionStore::new(BlogApiClient::new(base_url), Box::new(persistence));
        (store, storage)
    }

    fn login_form() -> LoginForm {
        LoginForm {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    const IDENTITY_JSON: &str = r#"{"_id":"u1","username":"a","token":"tok"}"#;

    #[tokio::test]
    async fn test_login_commits_identity_slot_and_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(200)
            .with_body(IDENTITY_JSON)
            .create_async()
            .await;

        let (store, storage) = store_with_storage(&server.url());
        let identity = store.login(&login_form()).await.unwrap();

        let state = store.state();
        assert_eq!(state.identity, Some(identity.clone()));
        assert_eq!(state.status.phase, OpPhase::Succeeded);

        // The durable slot holds the same identity, serialized.
        let raw = storage
            .get(StorageKeys::SESSION_IDENTITY)
            .unwrap()
            .expect("slot should be populated");
        let persisted: Identity = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, identity);
        assert_eq!(persisted.id, "u1");
        assert_eq!(persisted.token, "tok");
    }

    #[tokio::test]
    async fn test_register_commits_identity_like_login() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/register")
            .with_status(201)
            .with_body(IDENTITY_JSON)
            .create_async()
            .await;

        let (store, storage) = store_with_storage(&server.url());
        let form = RegistrationForm {
            username: "a".to_string(),
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        };
        store.register(&form).await.unwrap();

        assert!(store.identity().is_some());
        assert!(storage.has(StorageKeys::SESSION_IDENTITY).unwrap());
        assert_eq!(store.state().status.phase, OpPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_login_failure_keeps_existing_identity() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(401)
            .with_body(r#"{"message":"Invalid credentials"}"#)
            .create_async()
            .await;

        let storage = Arc::new(MemoryStorage::new());
        storage.set(StorageKeys::SESSION_IDENTITY, IDENTITY_JSON).unwrap();
        let persistence = SlotPersistence::new(Box::new(SharedStorage(storage.clone())));
        let store = SessionStore::new(BlogApiClient::new(server.url()), Box::new(persistence));
        assert!(store.identity().is_some(), "seeded identity should rehydrate");

        let err = store.login(&login_form()).await.unwrap_err();
        assert!(matches!(err, EngineError::Api(_)));

        let state = store.state();
        assert!(state.identity.is_some(), "identity must survive a failed login");
        assert_eq!(state.status.phase, OpPhase::Failed);
        assert_eq!(state.status.message.as_deref(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/login")
            .expect(0)
            .create_async()
            .await;

        let (store, _) = store_with_storage(&server.url());
        let err = store
            .login(&LoginForm {
                email: String::new(),
                password: "abc".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
        // Status is untouched: field errors are not a store failure.
        assert_eq!(store.state().status.phase, OpPhase::Idle);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_logout_clears_identity_slot_and_resets_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(200)
            .with_body(IDENTITY_JSON)
            .create_async()
            .await;

        let (store, storage) = store_with_storage(&server.url());
        store.login(&login_form()).await.unwrap();
        assert!(store.identity().is_some());

        store.logout();

        let state = store.state();
        assert!(state.identity.is_none());
        assert_eq!(state.status.phase, OpPhase::Idle, "logout resets to idle, not succeeded");
        assert_eq!(storage.get(StorageKeys::SESSION_IDENTITY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_discards_inflight_login_settlement() {
        let mut server = mockito::Server::new_async().await;
        // Hold the response body back so the login is still in flight when
        // logout takes its ticket.
        server
            .mock("POST", "/api/auth/login")
            .with_status(200)
            .with_chunked_body(|body| {
                std::thread::sleep(std::time::Duration::from_millis(300));
                body.write_all(IDENTITY_JSON.as_bytes())
            })
            .create_async()
            .await;

        let (store, storage) = store_with_storage(&server.url());
        let form = login_form();
        let (outcome, _) = tokio::join!(store.login(&form), async {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            store.logout();
        });

        // The caller still receives the server's answer...
        assert!(outcome.is_ok());
        // ...but the store holds logout's newer ticket, so the settlement
        // must not resurrect the cleared identity.
        let state = store.state();
        assert!(state.identity.is_none(), "stale login must not restore identity");
        assert_eq!(state.status.phase, OpPhase::Idle);
        assert_eq!(storage.get(StorageKeys::SESSION_IDENTITY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_reset_status_is_idempotent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let (store, _) = store_with_storage(&server.url());
        let _ = store.login(&login_form()).await;
        assert_eq!(store.state().status.phase, OpPhase::Failed);

        store.reset_status();
        assert_eq!(store.state().status, OperationStatus::idle());
        store.reset_status();
        assert_eq!(store.state().status, OperationStatus::idle());
        assert!(store.identity().is_none());
    }

    #[test]
    fn test_rehydration_tolerates_garbage() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(StorageKeys::SESSION_IDENTITY, "not valid json")
            .unwrap();
        let persistence = SlotPersistence::new(Box::new(SharedStorage(storage)));
        let store = SessionStore::new(BlogApiClient::new("http://localhost:5000"), Box::new(persistence));
        assert!(store.identity().is_none());
        assert_eq!(store.state().status.phase, OpPhase::Idle);
    }

    #[test]
    fn test_rehydration_restores_well_formed_identity() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(StorageKeys::SESSION_IDENTITY, IDENTITY_JSON).unwrap();
        let persistence = SlotPersistence::new(Box::new(SharedStorage(storage)));
        let store = SessionStore::new(BlogApiClient::new("http://localhost:5000"), Box::new(persistence));

        let identity = store.identity().expect("identity should rehydrate");
        assert_eq!(identity.id, "u1");
        assert_eq!(store.credential().as_deref(), Some("tok"));
    }
}
