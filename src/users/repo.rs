use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Debit, NewUser, User};

/// Persistence seam for the `users` table.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    /// Returns `None` when the email is already registered.
    async fn create(&self, new: NewUser<'_>) -> anyhow::Result<Option<User>>;
    async fn update_password_hash(&self, id: i64, password_hash: &str) -> anyhow::Result<()>;
    /// All users, newest first.
    async fn list(&self) -> anyhow::Result<Vec<User>>;
    /// Overwrites the balance. `None` when no such user.
    async fn set_balance(&self, id: i64, balance: i32) -> anyhow::Result<Option<User>>;
    /// Subtracts `amount` only if the balance covers it.
    async fn debit(&self, id: i64, amount: i32) -> anyhow::Result<Debit>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, energy_balance, is_admin, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, energy_balance, is_admin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn create(&self, new: NewUser<'_>) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, energy_balance, is_admin)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password_hash, energy_balance, is_admin, created_at
            "#,
        )
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.energy_balance)
        .bind(new.is_admin)
        .fetch_optional(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.db)
            .await
            .context("update password hash")?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, energy_balance, is_admin, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(rows)
    }

    async fn set_balance(&self, id: i64, balance: i32) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET energy_balance = $1
             WHERE id = $2
            RETURNING id, email, password_hash, energy_balance, is_admin, created_at
            "#,
        )
        .bind(balance)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("set balance")?;
        Ok(user)
    }

    async fn debit(&self, id: i64, amount: i32) -> anyhow::Result<Debit> {
        let remaining = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE users
               SET energy_balance = energy_balance - $1
             WHERE id = $2 AND energy_balance >= $1
            RETURNING energy_balance
            "#,
        )
        .bind(amount)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("debit balance")?;

        if let Some(remaining) = remaining {
            return Ok(Debit::Applied { remaining });
        }

        let current =
            sqlx::query_scalar::<_, i32>("SELECT energy_balance FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await
                .context("read balance after failed debit")?;

        Ok(match current {
            Some(current) => Debit::Insufficient { current },
            None => Debit::Missing,
        })
    }
}
