//! User repository for database operations

use crate::db::{from_db_id, to_db_id};
use anyhow::Result;
use chrono::{DateTime, Utc};
use devbook_shared::validation::UserFields;
use devbook_shared::UserResponse;
use sqlx::PgPool;

/// Public user columns; the password hash is never selected here
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub nick: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn into_response(self) -> Result<UserResponse> {
        Ok(UserResponse {
            id: from_db_id(self.id)?,
            name: self.name,
            nick: self.nick,
            email: self.email,
            created_at: self.created_at,
        })
    }
}

/// What login needs to check a credential
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CredentialRecord {
    pub id: i64,
    pub password_hash: String,
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a user. Fails with a unique violation on a taken nick or email.
    pub async fn create(pool: &PgPool, fields: &UserFields, password_hash: &str) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, nick, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, nick, email, created_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.nick)
        .bind(&fields.email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Users whose name or nick contains `query`, case-insensitive
    pub async fn search(pool: &PgPool, query: &str) -> Result<Vec<UserRecord>> {
        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));

        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, nick, email, created_at
            FROM users
            WHERE LOWER(name) LIKE $1 OR LOWER(nick) LIKE $1
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: u64) -> Result<Option<UserRecord>> {
        let Ok(id) = to_db_id(id) else {
            return Ok(None);
        };

        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, nick, email, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Check if a user exists
    pub async fn exists(pool: &PgPool, id: u64) -> Result<bool> {
        let Ok(id) = to_db_id(id) else {
            return Ok(false);
        };

        let result = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(result)
    }

    /// Find the stored credential for an email address
    pub async fn find_credentials_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<CredentialRecord>> {
        let record = sqlx::query_as::<_, CredentialRecord>(
            "SELECT id, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Current password hash of a user
    pub async fn find_password_hash(pool: &PgPool, id: u64) -> Result<Option<String>> {
        let Ok(id) = to_db_id(id) else {
            return Ok(None);
        };

        let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(hash)
    }

    /// Update profile fields. Returns false when the user does not exist.
    pub async fn update(pool: &PgPool, id: u64, fields: &UserFields) -> Result<bool> {
        let Ok(id) = to_db_id(id) else {
            return Ok(false);
        };

        let result = sqlx::query("UPDATE users SET name = $2, nick = $3, email = $4 WHERE id = $1")
            .bind(id)
            .bind(&fields.name)
            .bind(&fields.nick)
            .bind(&fields.email)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a user; their posts and follow edges cascade
    pub async fn delete(pool: &PgPool, id: u64) -> Result<bool> {
        let Ok(id) = to_db_id(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace the stored password hash
    pub async fn update_password(pool: &PgPool, id: u64, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(to_db_id(id)?)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Record that `follower_id` follows `user_id`; following twice is a no-op
    pub async fn follow(pool: &PgPool, user_id: u64, follower_id: u64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO followers (user_id, follower_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(to_db_id(user_id)?)
        .bind(to_db_id(follower_id)?)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Remove a follow edge if present
    pub async fn unfollow(pool: &PgPool, user_id: u64, follower_id: u64) -> Result<()> {
        sqlx::query("DELETE FROM followers WHERE user_id = $1 AND follower_id = $2")
            .bind(to_db_id(user_id)?)
            .bind(to_db_id(follower_id)?)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Users following `user_id`
    pub async fn followers(pool: &PgPool, user_id: u64) -> Result<Vec<UserRecord>> {
        let Ok(user_id) = to_db_id(user_id) else {
            return Ok(Vec::new());
        };

        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT u.id, u.name, u.nick, u.email, u.created_at
            FROM users u
            INNER JOIN followers f ON u.id = f.follower_id
            WHERE f.user_id = $1
            ORDER BY u.id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Users that `user_id` follows
    pub async fn following(pool: &PgPool, user_id: u64) -> Result<Vec<UserRecord>> {
        let Ok(user_id) = to_db_id(user_id) else {
            return Ok(Vec::new());
        };

        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT u.id, u.name, u.nick, u.email, u.created_at
            FROM users u
            INNER JOIN followers f ON u.id = f.user_id
            WHERE f.follower_id = $1
            ORDER BY u.id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}

/// Escape `LIKE` metacharacters so search input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
