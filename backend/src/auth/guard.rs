//! Ownership checks for resource-mutating handlers
//!
//! Three policies are applied inline by handlers after the principal has
//! been extracted from the token:
//! - [`ensure_self`]: the principal is the addressed user (profile edit,
//!   delete, password change)
//! - [`ensure_owner`]: the principal authored the addressed resource; needs
//!   a read before the decision
//! - [`ensure_not_self`]: the principal is *not* the addressed user
//!   (follow/unfollow)

use super::token::UserId;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Outcome of a failed ownership check
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("forbidden")]
    Forbidden,

    #[error("resource not found")]
    NotFound,

    #[error("owner lookup failed")]
    Lookup(#[from] anyhow::Error),
}

/// Resolves the user that owns a resource
#[async_trait]
pub trait OwnerLookup: Send + Sync {
    /// Owning user of `resource_id`, or `None` if the resource does not exist
    async fn find_owner_of(&self, resource_id: u64) -> anyhow::Result<Option<UserId>>;
}

/// The principal must be the addressed user
pub fn ensure_self(principal: UserId, target: UserId) -> Result<(), GuardError> {
    if principal != target {
        debug!(principal, target, "Rejected action on another user's account");
        return Err(GuardError::Forbidden);
    }
    Ok(())
}

/// The principal must not be the addressed user
pub fn ensure_not_self(principal: UserId, target: UserId) -> Result<(), GuardError> {
    if principal == target {
        debug!(principal, "Rejected self-directed action");
        return Err(GuardError::Forbidden);
    }
    Ok(())
}

/// Load the owner of `resource_id` and require it to be the principal
pub async fn ensure_owner<L>(
    lookup: &L,
    resource_id: u64,
    principal: UserId,
) -> Result<(), GuardError>
where
    L: OwnerLookup + ?Sized,
{
    let owner = lookup
        .find_owner_of(resource_id)
        .await?
        .ok_or(GuardError::NotFound)?;

    if owner != principal {
        debug!(principal, owner, resource_id, "Rejected action on resource owned by another user");
        return Err(GuardError::Forbidden);
    }
    Ok(())
}
