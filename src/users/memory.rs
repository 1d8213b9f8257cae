use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use super::repo::UserStore;
use super::repo_types::{Debit, NewUser, User};

/// `UserStore` backed by a `Vec`, for route tests.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn insert(&self, email: &str, password_hash: &str, energy_balance: i32) -> User {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.len() as i64 + 1,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            energy_balance,
            is_admin: false,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        user
    }

    pub fn balance_of(&self, id: i64) -> Option<i32> {
        self.get(id).map(|u| u.energy_balance)
    }

    pub fn get(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.get(id))
    }

    async fn create(&self, new: NewUser<'_>) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new.email) {
            return Ok(None);
        }
        let user = User {
            id: users.len() as i64 + 1,
            email: new.email.to_string(),
            password_hash: new.password_hash.to_string(),
            energy_balance: new.energy_balance,
            is_admin: new.is_admin,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> anyhow::Result<()> {
        if let Some(u) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            u.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn set_balance(&self, id: i64, balance: i32) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id == id).map(|u| {
            u.energy_balance = balance;
            u.clone()
        }))
    }

    async fn debit(&self, id: i64, amount: i32) -> anyhow::Result<Debit> {
        let mut users = self.users.lock().unwrap();
        Ok(match users.iter_mut().find(|u| u.id == id) {
            None => Debit::Missing,
            Some(u) if u.energy_balance < amount => Debit::Insufficient {
                current: u.energy_balance,
            },
            Some(u) => {
                u.energy_balance -= amount;
                Debit::Applied {
                    remaining: u.energy_balance,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn debit_never_goes_negative() {
        let store = MemoryUserStore::default();
        let user = store.insert("a@b.co", "x", 30);

        assert_eq!(
            store.debit(user.id, 20).await.unwrap(),
            Debit::Applied { remaining: 10 }
        );
        assert_eq!(
            store.debit(user.id, 20).await.unwrap(),
            Debit::Insufficient { current: 10 }
        );
        assert_eq!(store.debit(999, 20).await.unwrap(), Debit::Missing);
        assert_eq!(store.balance_of(user.id), Some(10));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = MemoryUserStore::default();
        let new = NewUser {
            email: "dup@b.co",
            password_hash: "h",
            energy_balance: 100,
            is_admin: false,
        };
        assert!(store.create(new.clone()).await.unwrap().is_some());
        assert!(store.create(new).await.unwrap().is_none());
    }
}
