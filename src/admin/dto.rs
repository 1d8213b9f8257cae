use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::User;

#[derive(Debug, Deserialize)]
pub struct AdminActionRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub new_balance: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<AdminUserItem>,
}

#[derive(Debug, Serialize)]
pub struct AdminUserItem {
    pub id: i64,
    pub email: String,
    pub energy_balance: i32,
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for AdminUserItem {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            energy_balance: u.energy_balance,
            is_admin: u.is_admin,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BalanceUpdated {
    pub id: i64,
    pub email: String,
    pub energy_balance: i32,
}

#[derive(Debug, Serialize)]
pub struct UpdateBalanceResponse {
    pub success: bool,
    pub user: BalanceUpdated,
}
