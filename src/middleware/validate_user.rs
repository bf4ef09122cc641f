use crate::auth::Identity;
use crate::database::UserStore;
use crate::error::ApiError;

/// Confirm the account behind an admitted API session is still in good
/// standing: it exists, is authorized, and still holds the token's role.
pub async fn revalidate(store: &dyn UserStore, identity: &Identity) -> Result<(), ApiError> {
    let user = store.find_by_id(identity.user_id).await?.ok_or_else(|| {
        tracing::warn!("User validation failed: user {} no longer exists", identity.user_id);
        ApiError::forbidden("Account no longer exists")
    })?;

    if !user.authorized {
        tracing::warn!("User validation failed: user {} has been disabled", user.id);
        return Err(ApiError::forbidden("Account is disabled"));
    }

    if user.role != identity.role {
        tracing::warn!(
            "User validation failed: token role '{}' doesn't match stored role '{}' for user {}",
            identity.role,
            user.role,
            user.id
        );
        return Err(ApiError::forbidden("Account role changed, please sign in again"));
    }

    tracing::debug!("User validation successful: {} ({})", user.email, user.role);
    Ok(())
}
