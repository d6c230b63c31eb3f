use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::client::HomestayClient;
use crate::error::HomestayError;
use crate::platform::{KeyValueStorage, LoginProvider, TOKEN_KEY, USER_INFO_KEY};
use crate::routes::Route;
use crate::types::{LoginResponse, SessionToken, User};

#[derive(Default)]
struct SessionState {
    token: Option<SessionToken>,
    user: Option<User>,
}

/// Session token and user profile.
///
/// The token is the single source of truth for "logged in". Both values are
/// mirrored to device storage under [`TOKEN_KEY`] and [`USER_INFO_KEY`].
pub struct Session {
    storage: Arc<dyn KeyValueStorage>,
    state: RwLock<SessionState>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session, restoring whatever the storage already holds.
    ///
    /// Unreadable entries are logged and treated as absent.
    pub fn restore(storage: Arc<dyn KeyValueStorage>) -> Self {
        let token = match storage.get(TOKEN_KEY) {
            Ok(value) => value.and_then(|t| SessionToken::new(t).ok()),
            Err(e) => {
                log::warn!("[Homestay] failed to read stored token: {}", e);
                None
            }
        };

        let user = match storage.get(USER_INFO_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::error!("[Homestay] failed to parse stored user info: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("[Homestay] failed to read stored user info: {}", e);
                None
            }
        };

        Self {
            storage,
            state: RwLock::new(SessionState { token, user }),
        }
    }

    pub async fn token(&self) -> Option<SessionToken> {
        self.state.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.state.read().await.token.is_some()
    }

    /// Store a fresh token and profile, in memory and in device storage.
    ///
    /// # Errors
    /// `Login` for an empty token, `Storage`/`Json` when persisting fails.
    /// Memory is only updated once both keys are written.
    pub async fn set_login_info(&self, token: &str, user: User) -> Result<(), HomestayError> {
        let token = SessionToken::new(token).map_err(HomestayError::Login)?;
        let serialized = serde_json::to_string(&user)?;

        let mut state = self.state.write().await;
        self.storage.set(TOKEN_KEY, token.as_str())?;
        self.storage.set(USER_INFO_KEY, &serialized)?;
        state.token = Some(token);
        state.user = Some(user);
        log::info!("[Homestay] session established");
        Ok(())
    }

    pub async fn set_token(&self, token: &str) -> Result<(), HomestayError> {
        let token = SessionToken::new(token).map_err(HomestayError::Login)?;
        let mut state = self.state.write().await;
        self.storage.set(TOKEN_KEY, token.as_str())?;
        state.token = Some(token);
        Ok(())
    }

    pub async fn set_user_info(&self, user: User) -> Result<(), HomestayError> {
        let serialized = serde_json::to_string(&user)?;
        let mut state = self.state.write().await;
        self.storage.set(USER_INFO_KEY, &serialized)?;
        state.user = Some(user);
        Ok(())
    }

    /// Drop token and profile. Storage failures are logged, never returned.
    pub async fn clear_login_info(&self) {
        let mut state = self.state.write().await;
        state.token = None;
        state.user = None;
        for key in [TOKEN_KEY, USER_INFO_KEY] {
            if let Err(e) = self.storage.remove(key) {
                log::warn!("[Homestay] failed to remove {}: {}", key, e);
            }
        }
        log::info!("[Homestay] session cleared");
    }

    pub async fn logout(&self) {
        self.clear_login_info().await;
    }

    /// Best-effort login without user interaction.
    ///
    /// With a stored token, the current user is fetched and a success counts
    /// as confirmation; a failure clears the session. Otherwise (or after that
    /// failure) the native handshake code is exchanged for a new session.
    /// Never fails: every error resolves to `false`.
    ///
    /// Both calls go out with this session's token, so a 401 tears down this
    /// session and no other.
    pub async fn silent_login(
        &self,
        client: &HomestayClient,
        provider: &dyn LoginProvider,
    ) -> bool {
        if self.is_logged_in().await {
            match client.get::<User>(self, &Route::Me.path()).await {
                Ok(user) => {
                    if let Err(e) = self.set_user_info(user).await {
                        log::warn!("[Homestay] failed to persist user info: {}", e);
                    }
                    return true;
                }
                Err(e) => {
                    log::info!("[Homestay] stored session rejected: {}", e);
                    self.clear_login_info().await;
                }
            }
        }

        let code = match provider.login_code().await {
            Ok(code) if !code.trim().is_empty() => code,
            Ok(_) => {
                log::info!("[Homestay] silent login: handshake returned no code");
                return false;
            }
            Err(e) => {
                log::info!("[Homestay] silent login failed: {}", e);
                return false;
            }
        };

        let exchange = client
            .post::<LoginResponse, _>(
                self,
                &Route::WxLogin.path(),
                &serde_json::json!({ "code": code }),
            )
            .await;
        match exchange {
            Ok(response) => match self.set_login_info(&response.token, response.user).await {
                Ok(()) => {
                    log::info!("[Homestay] silent login succeeded");
                    true
                }
                Err(e) => {
                    log::warn!("[Homestay] silent login could not store session: {}", e);
                    false
                }
            },
            Err(e) => {
                log::info!("[Homestay] silent login failed: {}", e);
                false
            }
        }
    }
}
