use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::auth::{hash_password_with_cost, Role};
use crate::database::models::User;
use crate::database::repository::{StoreError, UserStore};

/// Process-local user store for tests and database-less local runs.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<BTreeMap<i64, User>>,
    offline: RwLock<bool>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account with a freshly hashed password and the next free id.
    ///
    /// Hashes at the minimum bcrypt cost; the store only backs tests and
    /// local runs.
    pub fn add(
        &self,
        email: &str,
        password: &str,
        role: Role,
        condominium_id: Option<i64>,
        authorized: bool,
    ) -> Result<User, StoreError> {
        let password_hash = hash_password_with_cost(password, 4)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let mut users = self.write()?;
        let id = users.keys().next_back().copied().unwrap_or(0) + 1;
        let now = Utc::now();
        let user = User {
            id,
            email: email.to_string(),
            password_hash,
            role,
            condominium_id,
            authorized,
            created_at: now,
            updated_at: now,
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    /// Make `health` fail, mimicking an unreachable database.
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut flag) = self.offline.write() {
            *flag = offline;
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<i64, User>>, StoreError> {
        self.users
            .read()
            .map_err(|_| StoreError::Corrupt("user store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<i64, User>>, StoreError> {
        self.users
            .write()
            .map_err(|_| StoreError::Corrupt("user store lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.trim();
        Ok(self
            .read()?
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn set_authorized(&self, id: i64, authorized: bool) -> Result<User, StoreError> {
        let mut users = self.write()?;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;
        user.authorized = authorized;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn health(&self) -> Result<(), StoreError> {
        let offline = self.offline.read().map(|flag| *flag).unwrap_or(true);
        if offline {
            return Err(StoreError::Database(crate::database::DatabaseError::Sqlx(
                sqlx::Error::PoolTimedOut,
            )));
        }
        Ok(())
    }
}
