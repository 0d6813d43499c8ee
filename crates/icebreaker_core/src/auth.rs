//! crates/icebreaker_core/src/auth.rs
//!
//! The authentication flow. An `AuthContext` is created once at startup,
//! handed by reference to every view, and is the only writer of the stored
//! session id and the in-memory current user.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{SignInRequest, SignUpRequest, User, UserId, UserUpdate};
use crate::ports::{IceBreakerApi, PortError};
use crate::session::SessionStore;
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("Not signed in")]
    NotSignedIn,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Authentication failed: {0}")]
    Rejected(#[source] PortError),
    #[error("Request failed: {0}")]
    Request(#[source] PortError),
    #[error("Could not access the stored session: {0}")]
    Storage(#[source] PortError),
}

pub struct AuthContext {
    api: Arc<dyn IceBreakerApi>,
    session: SessionStore,
    session_user_id: Option<UserId>,
    current_user: Option<User>,
}

impl AuthContext {
    /// Reads the stored session once; a present id means `Authenticated`.
    pub fn init(api: Arc<dyn IceBreakerApi>, session: SessionStore) -> Result<Self, AuthError> {
        let session_user_id = session.session_user_id().map_err(AuthError::Storage)?;
        Ok(Self {
            api,
            session,
            session_user_id,
            current_user: None,
        })
    }

    pub fn state(&self) -> AuthState {
        if self.session_user_id.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    pub fn session_user_id(&self) -> Option<&UserId> {
        self.session_user_id.as_ref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Gate for views that need a signed-in viewer.
    pub fn require_session(&self) -> Result<&UserId, AuthError> {
        self.session_user_id.as_ref().ok_or(AuthError::NotSignedIn)
    }

    pub async fn sign_in(&mut self, credentials: SignInRequest) -> Result<&User, AuthError> {
        validation::sign_in(&credentials)?;
        let user = self.api.sign_in(&credentials).await.map_err(|e| {
            warn!(error = %e, "Sign-in failed.");
            AuthError::Rejected(e)
        })?;
        self.establish(user)
    }

    pub async fn sign_up(&mut self, profile: SignUpRequest) -> Result<&User, AuthError> {
        validation::sign_up(&profile)?;
        let user = self.api.sign_up(&profile).await.map_err(|e| {
            warn!(error = %e, "Sign-up failed.");
            AuthError::Rejected(e)
        })?;
        self.establish(user)
    }

    pub fn sign_out(&mut self) -> Result<(), AuthError> {
        self.current_user = None;
        self.session_user_id = None;
        self.session.clear_session().map_err(AuthError::Storage)?;
        info!("Signed out.");
        Ok(())
    }

    /// Resolves the signed-in user, fetching it once per context.
    ///
    /// A lookup that says the user is gone or rejected ends the session.
    pub async fn load_current_user(&mut self) -> Result<&User, AuthError> {
        let user_id = self.require_session()?.clone();
        let cached = matches!(&self.current_user, Some(user) if user.id == user_id);
        if !cached {
            match self.api.get_user(&user_id).await {
                Ok(user) => self.current_user = Some(user),
                Err(e) => {
                    self.invalidate_if_stale(&e)?;
                    return Err(AuthError::Request(e));
                }
            }
        }
        self.current_user.as_ref().ok_or(AuthError::NotSignedIn)
    }

    /// Signs out when `error` shows the stored session refers to nothing live.
    ///
    /// Only pass errors from calls made on behalf of the session's own user.
    pub fn invalidate_if_stale(&mut self, error: &PortError) -> Result<bool, AuthError> {
        if self.session_user_id.is_none() || !error.invalidates_session() {
            return Ok(false);
        }
        warn!(error = %error, "Stored session is stale; signing out.");
        self.sign_out()?;
        Ok(true)
    }

    pub async fn update_profile(&mut self, update: UserUpdate) -> Result<&User, AuthError> {
        validation::user_update(&update)?;
        let user_id = self.require_session()?.clone();
        let user = match self.api.update_user(&user_id, &update).await {
            Ok(user) => user,
            Err(e) => {
                self.invalidate_if_stale(&e)?;
                return Err(AuthError::Request(e));
            }
        };
        info!(user_id = %user.id, "Profile updated.");
        Ok(&*self.current_user.insert(user))
    }

    fn establish(&mut self, user: User) -> Result<&User, AuthError> {
        self.session
            .set_session_user_id(&user.id)
            .map_err(AuthError::Storage)?;
        self.session_user_id = Some(user.id.clone());
        info!(user_id = %user.id, "Signed in.");
        Ok(&*self.current_user.insert(user))
    }
}
