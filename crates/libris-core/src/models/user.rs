use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Username/password pair posted to the token endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Profile returned by `/auth/users/me/`.
///
/// The backend owns the shape of this record; the common fields are typed
/// and everything else is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Best available name for display.
    pub fn display_name(&self) -> String {
        if let Some(ref username) = self.username {
            if !username.is_empty() {
                return username.clone();
            }
        }
        if let Some(Value::String(name)) = self.extra.get("name") {
            return name.clone();
        }
        if let Some(ref email) = self.email {
            if !email.is_empty() {
                return email.clone();
            }
        }
        match self.id {
            Some(id) => format!("user #{}", id),
            None => "unknown user".to_string(),
        }
    }
}

/// Registration payload for `/auth/users/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Payload for `/auth/users/set_password/`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub new_password: String,
    pub current_password: String,
}
