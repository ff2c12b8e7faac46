//! Post repository for database operations

use crate::auth::{OwnerLookup, UserId};
use crate::db::{from_db_id, to_db_id};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devbook_shared::validation::PostFields;
use devbook_shared::PostResponse;
use sqlx::PgPool;

/// Post joined with its author's nick
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub author_nick: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

impl PostRecord {
    pub fn into_response(self) -> Result<PostResponse> {
        Ok(PostResponse {
            id: from_db_id(self.id)?,
            title: self.title,
            content: self.content,
            author_id: from_db_id(self.author_id)?,
            author_nick: self.author_nick,
            likes: u64::try_from(self.likes)?,
            created_at: self.created_at,
        })
    }
}

/// Post repository for database operations
pub struct PostRepository;

impl PostRepository {
    /// Insert a post authored by `author_id`
    pub async fn create(pool: &PgPool, author_id: u64, fields: &PostFields) -> Result<PostRecord> {
        let post = sqlx::query_as::<_, PostRecord>(
            r#"
            WITH inserted AS (
                INSERT INTO posts (title, content, author_id)
                VALUES ($1, $2, $3)
                RETURNING id, title, content, author_id, likes, created_at
            )
            SELECT i.id, i.title, i.content, i.author_id, u.nick AS author_nick, i.likes, i.created_at
            FROM inserted i
            INNER JOIN users u ON u.id = i.author_id
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(to_db_id(author_id)?)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    /// Posts by `user_id` and by everyone `user_id` follows, newest first
    pub async fn feed(pool: &PgPool, user_id: u64) -> Result<Vec<PostRecord>> {
        let Ok(user_id) = to_db_id(user_id) else {
            return Ok(Vec::new());
        };

        let posts = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT DISTINCT p.id, p.title, p.content, p.author_id, u.nick AS author_nick,
                   p.likes, p.created_at
            FROM posts p
            INNER JOIN users u ON u.id = p.author_id
            LEFT JOIN followers f ON f.user_id = p.author_id
            WHERE p.author_id = $1 OR f.follower_id = $1
            ORDER BY p.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Find post by ID
    pub async fn find_by_id(pool: &PgPool, id: u64) -> Result<Option<PostRecord>> {
        let Ok(id) = to_db_id(id) else {
            return Ok(None);
        };

        let post = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT p.id, p.title, p.content, p.author_id, u.nick AS author_nick,
                   p.likes, p.created_at
            FROM posts p
            INNER JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// All posts written by `author_id`, newest first
    pub async fn find_by_author(pool: &PgPool, author_id: u64) -> Result<Vec<PostRecord>> {
        let Ok(author_id) = to_db_id(author_id) else {
            return Ok(Vec::new());
        };

        let posts = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT p.id, p.title, p.content, p.author_id, u.nick AS author_nick,
                   p.likes, p.created_at
            FROM posts p
            INNER JOIN users u ON u.id = p.author_id
            WHERE p.author_id = $1
            ORDER BY p.id DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Author of a post
    pub async fn find_author(pool: &PgPool, id: u64) -> Result<Option<u64>> {
        let Ok(id) = to_db_id(id) else {
            return Ok(None);
        };

        let author = sqlx::query_scalar::<_, i64>("SELECT author_id FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        author.map(from_db_id).transpose()
    }

    /// Replace title and content. Returns false when the post does not exist.
    pub async fn update(pool: &PgPool, id: u64, fields: &PostFields) -> Result<bool> {
        let result = sqlx::query("UPDATE posts SET title = $2, content = $3 WHERE id = $1")
            .bind(to_db_id(id)?)
            .bind(&fields.title)
            .bind(&fields.content)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a post
    pub async fn delete(pool: &PgPool, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(to_db_id(id)?)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Increment the like counter
    pub async fn like(pool: &PgPool, id: u64) -> Result<bool> {
        let Ok(id) = to_db_id(id) else {
            return Ok(false);
        };

        let result = sqlx::query("UPDATE posts SET likes = likes + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Decrement the like counter, never below zero
    pub async fn unlike(pool: &PgPool, id: u64) -> Result<bool> {
        let Ok(id) = to_db_id(id) else {
            return Ok(false);
        };

        let result = sqlx::query("UPDATE posts SET likes = GREATEST(likes - 1, 0) WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Resolves post authors for ownership checks
pub struct PostAuthors<'a>(pub &'a PgPool);

#[async_trait]
impl OwnerLookup for PostAuthors<'_> {
    async fn find_owner_of(&self, resource_id: u64) -> Result<Option<UserId>> {
        PostRepository::find_author(self.0, resource_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(likes: i64) -> PostRecord {
        PostRecord {
            id: 10,
            title: "Hello".to_string(),
            content: "World".to_string(),
            author_id: 42,
            author_nick: "ada".to_string(),
            likes,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_into_response() {
        let response = record(3).into_response().unwrap();
        assert_eq!(response.id, 10);
        assert_eq!(response.author_id, 42);
        assert_eq!(response.likes, 3);
    }

    #[test]
    fn test_negative_like_count_is_rejected() {
        assert!(record(-1).into_response().is_err());
    }
}
