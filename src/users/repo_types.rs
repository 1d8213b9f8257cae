use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, or legacy SHA-256 hex
    pub energy_balance: i32,
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub energy_balance: i32,
    pub is_admin: bool,
}

/// Outcome of a conditional balance debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Debit {
    Applied { remaining: i32 },
    Insufficient { current: i32 },
    Missing,
}
