//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the auth layer.

pub mod post;
pub mod user;

pub use post::PostService;
pub use user::UserService;

use crate::auth::UserId;
use crate::error::ApiError;
use crate::repositories::{is_foreign_key_violation, UserRepository};
use sqlx::PgPool;
use tracing::warn;

/// Tokens outlive account deletion, so a principal whose account is gone
/// counts as unauthenticated.
pub(crate) async fn ensure_account_exists(pool: &PgPool, principal: UserId) -> Result<(), ApiError> {
    if UserRepository::exists(pool, principal).await? {
        Ok(())
    } else {
        warn!(user_id = principal, "Token names a deleted account");
        Err(ApiError::Unauthorized)
    }
}

/// A write that references the principal lost a race with account deletion
pub(crate) fn unauthorized_or_internal(err: anyhow::Error) -> ApiError {
    if is_foreign_key_violation(&err) {
        ApiError::Unauthorized
    } else {
        ApiError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_write_errors_stay_internal() {
        let err = unauthorized_or_internal(anyhow::anyhow!("boom"));
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
