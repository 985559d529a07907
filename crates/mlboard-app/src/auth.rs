//! Login, registration, and session lifecycle.

use std::sync::Arc;

use mlboard_core::backend::Backend;
use mlboard_core::error::{BoardError, Result};
use mlboard_core::session::{LoginCredentials, RegisterPayload, Session, SessionStore, UserProfile};
use mlboard_core::validation;

/// Authentication state of the application.
///
/// Until the one-time storage read completes the state is `Initializing`
/// and protected views render nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Initializing,
    Anonymous,
    Authenticated(Session),
}

/// Owns the session lifecycle: the narrow storage interface, the backend
/// bearer token, and the current authentication state.
pub struct AuthFlow {
    backend: Arc<dyn Backend>,
    store: Arc<dyn SessionStore>,
    state: AuthState,
}

impl AuthFlow {
    pub fn new(backend: Arc<dyn Backend>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            backend,
            store,
            state: AuthState::Initializing,
        }
    }

    /// Reads storage once at startup and applies any stored session.
    pub async fn initialize(&mut self) -> Result<()> {
        match self.store.get().await? {
            Some(session) if session.is_authenticated() => {
                self.backend.set_bearer(Some(session.token.clone()));
                tracing::debug!(user = %session.user.user_name, "restored session");
                self.state = AuthState::Authenticated(session);
            }
            _ => self.state = AuthState::Anonymous,
        }
        Ok(())
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn token_present(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        match &self.state {
            AuthState::Authenticated(session) => Some(&session.user),
            _ => None,
        }
    }

    /// Gate for protected views: blocks with a directive message instead
    /// of attempting a call that would fail.
    pub fn require_token(&self) -> Result<()> {
        match self.state {
            AuthState::Authenticated(_) => Ok(()),
            AuthState::Initializing => Err(BoardError::precondition(
                "Session is still initializing. Try again in a moment.",
            )),
            AuthState::Anonymous => Err(BoardError::precondition(
                "Missing auth token. Please log in first to authorize the request.",
            )),
        }
    }

    /// Logs in, persists the session, and attaches the bearer token.
    pub async fn login(&mut self, user_name: &str, password: &str) -> Result<Session> {
        validation::validate_login(user_name, password)?;
        let response = self
            .backend
            .login(&LoginCredentials {
                user_name: user_name.to_string(),
                password: password.to_string(),
            })
            .await?;
        let session = Session::from(response);
        self.store.set(&session).await?;
        self.backend.set_bearer(Some(session.token.clone()));
        self.state = AuthState::Authenticated(session.clone());
        Ok(session)
    }

    /// Registers a new account. Validation failures surface the first
    /// offending field; the server acknowledgement message is returned.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<String> {
        if let Some(first) = validation::validate_registration(payload).into_iter().next() {
            return Err(BoardError::field_validation(first.field, first.message));
        }
        let response = self.backend.register(payload).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "User created successfully.".to_string()))
    }

    /// Clears the stored session and drops the bearer token.
    pub async fn logout(&mut self) -> Result<()> {
        self.store.clear().await?;
        self.backend.set_bearer(None);
        self.state = AuthState::Anonymous;
        Ok(())
    }
}
