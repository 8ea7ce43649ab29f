//! Account and session models

use serde::{Deserialize, Serialize};

/// Session user, mirrored into the active storage tier as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Only registration reports the id; the profile endpoint omits it.
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    /// Stamped at session-record creation; the backend does not report the
    /// real account creation time.
    pub created_at: String,
}

impl User {
    /// Build a session record from a fetched profile.
    pub fn from_profile(profile: UserProfile) -> Self {
        Self {
            id: None,
            username: profile.username,
            email: profile.email,
            avatar: profile.avatar,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Minimal record used when the profile fetch after login fails.
    pub fn minimal(username: &str) -> Self {
        Self {
            id: None,
            username: username.to_string(),
            email: String::new(),
            avatar: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: String,
}
