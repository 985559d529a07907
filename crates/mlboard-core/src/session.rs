//! Session model and the narrow storage interface that gates protected views.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Profile fields returned by the login endpoint, kept alongside the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expiration: Option<String>,
}

/// An authenticated session: the bearer token plus the user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

impl Session {
    /// A non-empty token implies authenticated.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Credentials sent to `POST /Account/Login`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub user_name: String,
    pub password: String,
}

/// Payload sent to `POST /Account/Register`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub user_name: String,
    pub full_name: String,
    pub phone_number1: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Response of a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expiration: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Session {
            token: response.token,
            user: UserProfile {
                user_name: response.user_name.unwrap_or_default(),
                email: response.email,
                full_name: response.full_name,
                token_type: response.token_type,
                expiration: response.expiration,
            },
        }
    }
}

/// A plain `{message}` acknowledgement from the server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// The narrow read/write interface for the persisted session.
///
/// All session state flows through this trait instead of ambient globals.
/// Startup reads storage exactly once; until that read completes, protected
/// views stay in an initializing state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, if any.
    async fn get(&self) -> Result<Option<Session>>;

    /// Persists the session, replacing any previous one.
    async fn set(&self, session: &Session) -> Result<()>;

    /// Removes the stored session.
    async fn clear(&self) -> Result<()>;
}
