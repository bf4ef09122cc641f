use serde::{Deserialize, Serialize};

use super::Role;

/// Decoded session token payload.
///
/// Keys are camelCase on the wire so tokens minted by the portals decode
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub condominium_id: Option<i64>,
    pub authorized: bool,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Who a session belongs to, without the timing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub condominium_id: Option<i64>,
    pub authorized: bool,
}

impl Claims {
    pub fn subject(&self) -> Subject {
        Subject {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            condominium_id: self.condominium_id,
            authorized: self.authorized,
        }
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// Identity of an admitted request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    pub condominium_id: Option<i64>,
}

impl From<&Claims> for Identity {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.id,
            email: claims.email.clone(),
            role: claims.role,
            condominium_id: claims.condominium_id,
        }
    }
}
