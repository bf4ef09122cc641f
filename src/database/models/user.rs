use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::{Role, Subject};
use crate::database::StoreError;

/// Raw `users` row as stored in PostgreSQL.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub condominium_id: Option<i64>,
    pub authorized: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account record with a typed role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub condominium_id: Option<i64>,
    pub authorized: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("user {}: {}", row.id, e)))?;
        Ok(Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role,
            condominium_id: row.condominium_id,
            authorized: row.authorized,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl User {
    pub fn subject(&self) -> Subject {
        Subject {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            condominium_id: self.condominium_id,
            authorized: self.authorized,
        }
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            condominium_id: self.condominium_id,
            authorized: self.authorized,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Client-facing user representation (never includes the password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub condominium_id: Option<i64>,
    pub authorized: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
