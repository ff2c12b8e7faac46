//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod post;
pub mod user;

pub use post::{PostAuthors, PostRecord, PostRepository};
pub use user::{CredentialRecord, UserRecord, UserRepository};

/// Whether a repository error is a unique-constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

/// Whether a repository error is a foreign-key violation
pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_foreign_key_violation())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        let err = anyhow::anyhow!("something else");
        assert!(!is_unique_violation(&err));

        let err: anyhow::Error = sqlx::Error::RowNotFound.into();
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn test_non_database_error_is_not_foreign_key_violation() {
        let err: anyhow::Error = sqlx::Error::RowNotFound.into();
        assert!(!is_foreign_key_violation(&err));
    }
}
