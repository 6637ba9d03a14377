use anyhow::Result;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::{Credentials, NewUser, PasswordChange, UserProfile};

use super::storage::{stored_token, SharedStorage, Storage, TOKEN_KEY};

/// Current credential and user profile.
///
/// The credential is mirrored into persisted storage on every change; the
/// profile lives only in memory. A profile is never held without a
/// credential.
pub struct SessionStore {
    storage: SharedStorage,
    auth: ApiClient,
    token: Option<String>,
    user: Option<UserProfile>,
}

impl SessionStore {
    /// Create a store, picking up any credential already persisted.
    pub fn new(auth: ApiClient) -> Result<Self> {
        let storage = auth.storage().clone();
        let token = stored_token(storage.as_ref())?;
        debug!(has_token = token.is_some(), "Session store initialized");
        Ok(Self {
            storage,
            auth,
            token,
            user: None,
        })
    }

    // ===== Queries =====

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().map(|t| !t.is_empty()).unwrap_or(false)
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    // ===== Mutations =====

    pub fn set_token(&mut self, token: String) -> Result<()> {
        self.storage.set(TOKEN_KEY, &token)?;
        self.token = Some(token);
        Ok(())
    }

    /// Remove the persisted credential, then forget it in memory. If
    /// storage refuses, the in-memory credential is kept.
    pub fn clear_token(&mut self) -> Result<()> {
        self.storage.remove(TOKEN_KEY)?;
        self.token = None;
        Ok(())
    }

    pub fn set_user(&mut self, user: UserProfile) {
        self.user = Some(user);
    }

    pub fn clear_user(&mut self) {
        self.user = None;
    }

    /// Drop the profile and credential after a failed call. A storage error
    /// here is logged rather than returned so the original failure reaches
    /// the caller; the in-memory credential then follows whatever storage
    /// still holds.
    fn clear_after_failure(&mut self) {
        self.clear_user();
        if let Err(e) = self.clear_token() {
            warn!(error = %e, "Failed to remove persisted credential");
            match stored_token(self.storage.as_ref()) {
                Ok(token) => self.token = token,
                Err(e) => warn!(error = %e, "Failed to re-read persisted credential"),
            }
        }
    }

    // ===== Actions =====

    /// Obtain a token for `credentials`, then load the user's profile.
    ///
    /// If either step fails the session is left fully cleared and the
    /// failure is returned.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        match self.try_login(credentials).await {
            Ok(()) => {
                info!(username = %credentials.username, "Logged in");
                Ok(())
            }
            Err(e) => {
                warn!(username = %credentials.username, error = %e, "Login failed");
                self.clear_after_failure();
                Err(e)
            }
        }
    }

    async fn try_login(&mut self, credentials: &Credentials) -> Result<()> {
        let token = self.auth.obtain_token(credentials).await?;
        self.set_token(token)?;
        let user = self.auth.fetch_current_user().await?;
        self.set_user(user);
        Ok(())
    }

    /// Forget the credential and profile. The backend is not contacted, so
    /// the token itself stays valid server-side. When the persisted
    /// credential cannot be removed the session is left as it was.
    pub fn logout(&mut self) -> Result<()> {
        self.clear_token()?;
        self.clear_user();
        info!("Logged out");
        Ok(())
    }

    /// Refresh the profile for the held credential.
    ///
    /// Without a credential this succeeds without sending anything. A
    /// rejected credential clears the session like a failed login.
    pub async fn fetch_current_user(&mut self) -> Result<()> {
        if !self.is_authenticated() {
            debug!("No credential held, skipping current user fetch");
            return Ok(());
        }
        match self.auth.fetch_current_user().await {
            Ok(user) => {
                debug!(user_id = ?user.id, "Current user loaded");
                self.set_user(user);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Stored credential rejected, clearing session");
                self.clear_after_failure();
                Err(e)
            }
        }
    }

    /// Create an account. The current session is left untouched.
    pub async fn register(&self, user: &NewUser) -> Result<serde_json::Value> {
        let created = self.auth.register_user(user).await?;
        info!(username = %user.username, "Registered new account");
        Ok(created)
    }

    /// Change the logged-in user's password. A rejection (e.g. wrong current
    /// password) does not end the session.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        self.auth.set_password(change).await?;
        info!("Password changed");
        Ok(())
    }
}
