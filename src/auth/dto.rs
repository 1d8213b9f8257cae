use serde::{Deserialize, Serialize};

use crate::users::User;

/// Body of the action-dispatching `POST /auth`.
#[derive(Debug, Deserialize)]
pub struct AuthActionRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(flatten)]
    pub credentials: Credentials,
}

/// Request body for registration and login.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after register, login or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: PublicUser,
    pub session_token: String,
    pub refresh_token: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub energy_balance: i32,
    pub is_admin: bool,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            energy_balance: u.energy_balance,
            is_admin: u.is_admin,
        }
    }
}
