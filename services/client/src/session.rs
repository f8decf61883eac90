//! services/client/src/session.rs
//!
//! The session store: the single source of truth for who is logged in.
//!
//! State lives in a `watch` channel so views can subscribe to it, and every
//! persisted value goes through the `SessionStorage` port. Token refresh is
//! shared: concurrent callers await the same in-flight future and only one
//! request reaches the backend.

use ezchef_core::domain::{AuthStatus, Credentials, RegistrationForm, Session, UserProfile};
use ezchef_core::ports::{
    decode, keys, ApiRequest, ClientError, HttpService, PortResult, SessionStorage,
};
use ezchef_core::validation::validate_registration;
use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{error, info, warn};

pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const REGISTER_PATH: &str = "/api/auth/register/";
pub const REFRESH_PATH: &str = "/api/auth/refresh/";
pub const PROFILE_PATH: &str = "/api/user/profile/";

//=========================================================================================
// Wire Types
//=========================================================================================

/// Body returned by login and register.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(alias = "access")]
    token: String,
    #[serde(default)]
    refresh: Option<String>,
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    /// Present when the backend rotates refresh tokens.
    #[serde(default)]
    refresh: Option<String>,
}

type RefreshFuture = Shared<BoxFuture<'static, PortResult<()>>>;
type PendingRefresh = WeakShared<BoxFuture<'static, PortResult<()>>>;

//=========================================================================================
// Session Store
//=========================================================================================

struct Inner {
    http: Arc<dyn HttpService>,
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<Session>,
    /// Weak so an abandoned refresh is dropped with its last awaiter.
    refresh_in_flight: Mutex<Option<PendingRefresh>>,
    /// Bumped by every logout, login and registration; async work started
    /// under an older value must not write session data.
    generation: AtomicU64,
}

/// Cheap to clone; every clone shares the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    pub fn new(http: Arc<dyn HttpService>, storage: Arc<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            inner: Arc::new(Inner {
                http,
                storage,
                state,
                refresh_in_flight: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    // --- Accessors ---

    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    pub fn status(&self) -> AuthStatus {
        self.inner.state.borrow().status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.inner.state.borrow().user.clone()
    }

    /// A receiver that observes every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// The username saved by a "remember me" login.
    pub fn remembered_username(&self) -> Option<String> {
        self.read(keys::REMEMBERED_USER)
    }

    // --- Lifecycle ---

    /// Restores a persisted session at startup.
    ///
    /// Never fails: any problem validating or refreshing the stored tokens
    /// ends in `Anonymous` with persisted data cleared.
    pub async fn initialize(&self) -> AuthStatus {
        let generation = self.generation();
        let token = self.read(keys::AUTH_TOKEN);
        let saved_user = self.read(keys::USER);

        let (Some(token), Some(saved_user)) = (token, saved_user) else {
            self.clear_persisted();
            self.inner.state.send_replace(Session::default());
            info!("No stored session found.");
            return AuthStatus::Anonymous;
        };

        self.inner.state.send_replace(Session {
            status: AuthStatus::Loading,
            user: serde_json::from_str(&saved_user).ok(),
            access_token: Some(token),
            refresh_token: self.read(keys::REFRESH_TOKEN),
        });

        let profile = match self.fetch_profile().await {
            Ok(user) => Ok(user),
            Err(e) if e.is_unauthorized() => {
                info!("Stored access token was rejected; attempting refresh.");
                match self.refresh().await {
                    Ok(()) => self.fetch_profile().await,
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        };

        let user = match profile {
            Ok(user) => user,
            Err(e) => {
                error!("Auth check error: {:?}", e);
                if generation == self.generation() {
                    self.logout();
                }
                return AuthStatus::Anonymous;
            }
        };

        match self.establish(user, generation) {
            Ok(user) => {
                info!("Restored session for {}", user.username);
                AuthStatus::Authenticated
            }
            Err(ClientError::Unauthenticated) => {
                info!("Session was cleared while it was being restored.");
                self.status()
            }
            Err(e) => {
                error!("Could not store the restored session: {:?}", e);
                self.logout();
                AuthStatus::Anonymous
            }
        }
    }

    /// Logs in and persists the returned tokens.
    ///
    /// With `remember` set the username is kept under `rememberedUser`;
    /// otherwise any remembered username is forgotten.
    pub async fn login(
        &self,
        credentials: &Credentials,
        remember: bool,
    ) -> PortResult<UserProfile> {
        let request = ApiRequest::post(LOGIN_PATH)
            .without_auth()
            .with_csrf()
            .body(credentials)?;

        let user = match self.authenticate(request).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Login failed for {}: {}", credentials.username, e);
                return Err(e);
            }
        };

        let remembered = if remember {
            self.inner
                .storage
                .set(keys::REMEMBERED_USER, &credentials.username)
        } else {
            self.inner.storage.remove(keys::REMEMBERED_USER)
        };
        if let Err(e) = remembered {
            warn!("Could not update the remembered username: {}", e);
        }

        info!("Logged in as {}", user.username);
        Ok(user)
    }

    /// Validates the form locally, then registers and logs in.
    pub async fn register(&self, form: &RegistrationForm) -> PortResult<UserProfile> {
        validate_registration(form)?;

        let request = ApiRequest::post(REGISTER_PATH)
            .without_auth()
            .with_csrf()
            .json(json!({
                "username": form.username,
                "email": form.email,
                "f_name": form.first_name,
                "l_name": form.last_name,
                "password": form.password,
            }));

        let user = match self.authenticate(request).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Registration failed for {}: {}", form.username, e);
                return Err(e);
            }
        };
        info!("Registered and logged in as {}", user.username);
        Ok(user)
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Concurrent calls share one backend request and one outcome. A missing
    /// refresh token or a rejected refresh logs the session out.
    pub async fn refresh(&self) -> PortResult<()> {
        let in_flight: RefreshFuture = {
            let mut slot = self.refresh_slot();
            match slot.as_ref().and_then(WeakShared::upgrade) {
                Some(pending) => pending,
                None => {
                    let store = self.clone();
                    let pending = async move { store.refresh_once().await }
                        .boxed()
                        .shared();
                    *slot = pending.downgrade();
                    pending
                }
            }
        };

        let outcome = in_flight.clone().await;

        let mut slot = self.refresh_slot();
        let finished = slot
            .as_ref()
            .and_then(WeakShared::upgrade)
            .is_some_and(|current| current.ptr_eq(&in_flight));
        if finished {
            *slot = None;
        }
        outcome
    }

    /// Clears all persisted session data and returns to `Anonymous`.
    ///
    /// Storage failures are logged; this never fails.
    pub fn logout(&self) {
        self.next_generation();
        self.clear_persisted();
        self.inner.state.send_replace(Session::default());
        info!("Logged out.");
    }

    /// Reacts to an error from a resource call. For a rejected access token
    /// this runs the shared refresh and returns `true` when the caller may
    /// retry; everything else returns `false` untouched.
    pub async fn recover(&self, err: &ClientError) -> bool {
        if !err.is_unauthorized() || !self.is_authenticated() {
            return false;
        }
        self.refresh().await.is_ok()
    }

    //=====================================================================================
    // Internals
    //=====================================================================================

    fn refresh_slot(&self) -> MutexGuard<'_, Option<PendingRefresh>> {
        self.inner
            .refresh_in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts a new session epoch; returns its generation.
    fn next_generation(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.inner.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Could not read {} from session storage: {}", key, e);
                None
            }
        }
    }

    fn clear_persisted(&self) {
        for key in keys::SESSION {
            if let Err(e) = self.inner.storage.remove(key) {
                warn!("Could not remove {} from session storage: {}", key, e);
            }
        }
    }

    /// Sends a login or register request and adopts the returned session.
    /// Starts a new generation first, so a refresh still running for the
    /// previous session cannot overwrite the new tokens.
    async fn authenticate(&self, request: ApiRequest) -> PortResult<UserProfile> {
        let generation = self.next_generation();
        let auth = self
            .inner
            .http
            .send(request)
            .await
            .and_then(decode::<AuthResponse>)?;
        self.persist_auth(auth, generation)
    }

    async fn fetch_profile(&self) -> PortResult<UserProfile> {
        self.inner
            .http
            .send(ApiRequest::get(PROFILE_PATH))
            .await
            .and_then(decode)
    }

    async fn refresh_once(&self) -> PortResult<()> {
        let generation = self.generation();
        let Some(refresh_token) = self.read(keys::REFRESH_TOKEN) else {
            warn!("No refresh token available; logging out.");
            self.logout();
            return Err(ClientError::Unauthenticated);
        };

        let request = ApiRequest::post(REFRESH_PATH)
            .without_auth()
            .json(json!({ "refresh": refresh_token }));

        let outcome = self
            .inner
            .http
            .send(request)
            .await
            .and_then(decode::<RefreshResponse>)
            .and_then(|tokens| {
                self.persist_tokens(&tokens.access, tokens.refresh.as_deref(), generation)
            });

        match outcome {
            Ok(()) => {
                info!("Access token refreshed.");
                Ok(())
            }
            Err(e) => {
                error!("Token refresh error: {:?}", e);
                if generation == self.generation() {
                    self.logout();
                }
                Err(e)
            }
        }
    }

    fn persist_tokens(
        &self,
        access: &str,
        refresh: Option<&str>,
        generation: u64,
    ) -> PortResult<()> {
        if generation != self.generation() {
            return Err(ClientError::Unauthenticated);
        }
        self.inner.storage.set(keys::AUTH_TOKEN, access)?;
        if let Some(refresh) = refresh {
            self.inner.storage.set(keys::REFRESH_TOKEN, refresh)?;
        }
        self.inner.state.send_modify(|session| {
            session.access_token = Some(access.to_string());
            if let Some(refresh) = refresh {
                session.refresh_token = Some(refresh.to_string());
            }
        });
        Ok(())
    }

    /// Stores the profile and marks the session authenticated.
    fn establish(&self, user: UserProfile, generation: u64) -> PortResult<UserProfile> {
        if generation != self.generation() {
            return Err(ClientError::Unauthenticated);
        }
        let serialized =
            serde_json::to_string(&user).map_err(|e| ClientError::Storage(e.to_string()))?;
        self.inner.storage.set(keys::USER, &serialized)?;

        let session = Session {
            status: AuthStatus::Authenticated,
            user: Some(user.clone()),
            access_token: self.read(keys::AUTH_TOKEN),
            refresh_token: self.read(keys::REFRESH_TOKEN),
        };
        self.inner.state.send_replace(session);
        Ok(user)
    }

    fn persist_auth(&self, auth: AuthResponse, generation: u64) -> PortResult<UserProfile> {
        let persisted = self
            .persist_tokens(&auth.token, auth.refresh.as_deref(), generation)
            .and_then(|()| self.establish(auth.user, generation));
        if let Err(e) = &persisted {
            error!("Could not persist the new session: {}", e);
            self.clear_persisted();
        }
        persisted
    }
}
