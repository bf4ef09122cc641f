// handlers/protected/users/mod.rs - Account administration (admin, superadmin)

pub mod authorization; // PUT /api/users/:id/authorization
pub mod show;          // GET /api/users/:id

pub use authorization::update_authorization;
pub use show::show;

use crate::auth::{Identity, Role};
use crate::database::{User, UserStore};
use crate::error::ApiError;

/// Whether `actor` may see or manage `target`.
///
/// Superadmins manage everyone. Admins manage non-superadmin accounts of
/// their own condominium. Everyone else manages nobody.
pub fn ensure_manageable(actor: &Identity, target: &User) -> Result<(), ApiError> {
    match actor.role {
        Role::Superadmin => Ok(()),
        Role::Admin => {
            if target.role == Role::Superadmin {
                return Err(ApiError::forbidden("Administrators cannot manage superadmin accounts"));
            }
            match (actor.condominium_id, target.condominium_id) {
                (Some(mine), Some(theirs)) if mine == theirs => Ok(()),
                _ => Err(ApiError::forbidden("User belongs to another condominium")),
            }
        }
        Role::Owner | Role::Supplier => Err(ApiError::forbidden("Not allowed to manage accounts")),
    }
}

async fn load_user(store: &dyn UserStore, id: i64) -> Result<User, ApiError> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user {} not found", id)))
}
