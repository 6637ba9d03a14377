//! Account endpoints served under `/auth/` on the backend origin.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{Credentials, NewUser, PasswordChange, UserProfile};

use super::ApiClient;

pub const TOKEN_LOGIN_PATH: &str = "/auth/token/login/";
pub const CURRENT_USER_PATH: &str = "/auth/users/me/";
pub const USERS_PATH: &str = "/auth/users/";
pub const SET_PASSWORD_PATH: &str = "/auth/users/set_password/";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    auth_token: String,
}

impl ApiClient {
    /// Exchange a username/password pair for a session token.
    pub async fn obtain_token(&self, credentials: &Credentials) -> Result<String> {
        let response: TokenResponse = self
            .post(TOKEN_LOGIN_PATH, credentials)
            .await
            .context("Login request failed")?;
        Ok(response.auth_token)
    }

    /// Profile of the user the stored credential belongs to.
    pub async fn fetch_current_user(&self) -> Result<UserProfile> {
        self.get(CURRENT_USER_PATH)
            .await
            .context("Failed to fetch current user")
    }

    /// Create an account. Returns the backend's record of the new user.
    pub async fn register_user(&self, user: &NewUser) -> Result<Value> {
        self.post(USERS_PATH, user)
            .await
            .context("Registration request failed")
    }

    pub async fn set_password(&self, change: &PasswordChange) -> Result<()> {
        self.post_empty(SET_PASSWORD_PATH, change)
            .await
            .context("Password change request failed")
    }
}
