use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{AdminBackend, ApiClient, UnauthorizedHandler};
use crate::auth::{Credentials, CurrentUser};
use crate::config::SessionConfig;
use crate::error::AccessError;
use crate::navigation::{Navigation, Navigator};
use crate::session::storage::TokenStore;

/// What every reader sees of the current identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Identity unknown until a pending backend call resolves
    #[default]
    Loading,
    Anonymous,
    Authenticated(Arc<CurrentUser>),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&Arc<CurrentUser>> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Routes the store navigates to on lifecycle transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRoutes {
    pub login_path: String,
    pub landing_path: String,
}

impl From<&SessionConfig> for SessionRoutes {
    fn from(config: &SessionConfig) -> Self {
        Self {
            login_path: config.login_path.clone(),
            landing_path: config.landing_path.clone(),
        }
    }
}

impl Default for SessionRoutes {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

/// Single writer of the session identity.
///
/// Every transition is published on a watch channel before the method
/// returns, so subscribers (route guards, the menu) always derive from the
/// latest snapshot. Readers only ever get `Arc<CurrentUser>` snapshots.
pub struct SessionStore {
    backend: Arc<dyn AdminBackend>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    routes: SessionRoutes,
    state: watch::Sender<SessionState>,
    /// Set while `login` runs; its own 401s are reported as login errors
    login_in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path of `login`
struct LoginAttempt<'a>(&'a AtomicBool);

impl<'a> LoginAttempt<'a> {
    fn begin(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoginAttempt<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SessionStore {
    pub fn new(
        backend: Arc<dyn AdminBackend>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        routes: SessionRoutes,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            backend,
            tokens,
            navigator,
            routes,
            state,
            login_in_flight: AtomicBool::new(false),
        }
    }

    /// Make this store the shared client's 401 reaction
    pub fn register_unauthorized_handler(self: &Arc<Self>, client: &ApiClient) -> bool {
        let handler: Arc<dyn UnauthorizedHandler> = self.clone();
        client.set_unauthorized_handler(Arc::downgrade(&handler))
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<Arc<CurrentUser>> {
        self.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn routes(&self) -> &SessionRoutes {
        &self.routes
    }

    /// Resolve the identity behind a stored token at startup. Fails closed.
    pub async fn initialize(&self) {
        let token = self.tokens.load().unwrap_or_else(|e| {
            warn!("Failed to read stored token: {}", e);
            None
        });

        if token.is_none() {
            self.publish(SessionState::Anonymous);
            return;
        }

        self.publish(SessionState::Loading);

        match self.backend.current_user().await {
            Ok(dto) => {
                let user = Arc::new(CurrentUser::from(dto));
                info!(user_id = user.id, role = %user.role.name, "session restored");
                self.publish(SessionState::Authenticated(user));
            }
            Err(e) => {
                warn!("{}", AccessError::IdentityFetchFailed(e));
                self.clear_token();
                self.publish(SessionState::Anonymous);
            }
        }
    }

    /// Exchange credentials for a token, then load the authoritative identity.
    ///
    /// The identity becomes visible only once `/auth/me` has answered; on
    /// success the host does a full page load to the landing route. Any
    /// failure leaves the store anonymous with no token stored.
    pub async fn login(&self, credentials: &Credentials) -> Result<Arc<CurrentUser>, AccessError> {
        let _attempt = LoginAttempt::begin(&self.login_in_flight);
        self.publish(SessionState::Loading);

        let response = match self.backend.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                warn!(email = %credentials.email, "login rejected: {}", e);
                self.clear_token();
                self.publish(SessionState::Anonymous);
                return Err(AccessError::LoginRejected(e));
            }
        };

        if let Err(e) = self.tokens.save(&response.token) {
            self.clear_token();
            self.publish(SessionState::Anonymous);
            return Err(e.into());
        }

        let user = match self.backend.current_user().await {
            Ok(dto) => Arc::new(CurrentUser::from(dto)),
            Err(e) => {
                self.clear_token();
                self.publish(SessionState::Anonymous);
                return Err(AccessError::IdentityFetchFailed(e));
            }
        };

        info!(user_id = user.id, role = %user.role.name, "logged in");
        self.publish(SessionState::Authenticated(user.clone()));
        self.navigator.navigate(Navigation::Full(self.routes.landing_path.clone()));

        Ok(user)
    }

    /// Best-effort server logout; local state is cleared regardless.
    pub async fn logout(&self) {
        if let Err(e) = self.backend.logout().await {
            warn!("Server-side logout failed, clearing local session anyway: {}", e);
        }

        info!("logged out");
        self.end_session();
    }

    /// Global reaction to a 401 from any backend call
    pub fn force_logout(&self) {
        info!("session rejected by backend");
        self.end_session();
    }

    fn end_session(&self) {
        self.clear_token();
        self.publish(SessionState::Anonymous);
        self.navigator.navigate(Navigation::Full(self.routes.login_path.clone()));
    }

    fn clear_token(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!("Failed to clear stored token: {}", e);
        }
    }

    fn publish(&self, state: SessionState) {
        self.state.send_replace(state);
    }
}

impl UnauthorizedHandler for SessionStore {
    fn on_unauthorized(&self) {
        if self.login_in_flight.load(Ordering::SeqCst) {
            debug!("401 during login, leaving it to the login attempt");
            return;
        }
        self.force_logout();
    }
}
