//! Post service
//!
//! Only a post's author may edit or delete it; any authenticated user may
//! read, like and unlike.

use crate::auth::{ensure_owner, UserId};
use crate::error::ApiError;
use crate::repositories::{PostAuthors, PostRecord, PostRepository};
use crate::services::{ensure_account_exists, unauthorized_or_internal};
use devbook_shared::validation::prepare_post;
use devbook_shared::{PostRequest, PostResponse};
use sqlx::PgPool;
use tracing::info;

/// Post service for business logic
pub struct PostService;

impl PostService {
    /// Publish a post as `author`
    pub async fn create(pool: &PgPool, author: UserId, request: PostRequest) -> Result<PostResponse, ApiError> {
        let fields = prepare_post(&request.title, &request.content)?;
        ensure_account_exists(pool, author).await?;
        let post = PostRepository::create(pool, author, &fields)
            .await
            .map_err(unauthorized_or_internal)?;

        info!(post_id = post.id, author_id = author, "Post created");
        Ok(post.into_response()?)
    }

    /// Posts by `principal` and the users they follow
    pub async fn feed(pool: &PgPool, principal: UserId) -> Result<Vec<PostResponse>, ApiError> {
        let posts = PostRepository::feed(pool, principal).await?;
        into_responses(posts)
    }

    /// Get a single post
    pub async fn get(pool: &PgPool, id: u64) -> Result<PostResponse, ApiError> {
        let post = PostRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

        Ok(post.into_response()?)
    }

    /// All posts by one user
    pub async fn by_author(pool: &PgPool, author: u64) -> Result<Vec<PostResponse>, ApiError> {
        let posts = PostRepository::find_by_author(pool, author).await?;
        into_responses(posts)
    }

    /// Edit a post the principal wrote
    pub async fn update(
        pool: &PgPool,
        principal: UserId,
        post_id: u64,
        request: PostRequest,
    ) -> Result<(), ApiError> {
        ensure_owner(&PostAuthors(pool), post_id, principal).await?;

        let fields = prepare_post(&request.title, &request.content)?;
        if !PostRepository::update(pool, post_id, &fields).await? {
            return Err(ApiError::NotFound("Post not found".to_string()));
        }

        Ok(())
    }

    /// Delete a post the principal wrote
    pub async fn delete(pool: &PgPool, principal: UserId, post_id: u64) -> Result<(), ApiError> {
        ensure_owner(&PostAuthors(pool), post_id, principal).await?;

        if !PostRepository::delete(pool, post_id).await? {
            return Err(ApiError::NotFound("Post not found".to_string()));
        }

        info!(post_id, author_id = principal, "Post deleted");
        Ok(())
    }

    /// Add a like
    pub async fn like(pool: &PgPool, post_id: u64) -> Result<(), ApiError> {
        if !PostRepository::like(pool, post_id).await? {
            return Err(ApiError::NotFound("Post not found".to_string()));
        }
        Ok(())
    }

    /// Remove a like; the count stops at zero
    pub async fn unlike(pool: &PgPool, post_id: u64) -> Result<(), ApiError> {
        if !PostRepository::unlike(pool, post_id).await? {
            return Err(ApiError::NotFound("Post not found".to_string()));
        }
        Ok(())
    }
}

fn into_responses(posts: Vec<PostRecord>) -> Result<Vec<PostResponse>, ApiError> {
    posts
        .into_iter()
        .map(|p| p.into_response().map_err(ApiError::Internal))
        .collect()
}
