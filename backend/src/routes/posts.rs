//! Post routes
//!
//! All mounted behind the auth gate. The author of a new post is always
//! the authenticated user, never a field of the request body.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::extract::Path;
use crate::services::PostService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use devbook_shared::{PostRequest, PostResponse};

/// Create post routes
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post).get(feed))
        .route("/posts/:id", get(get_post).put(update_post).delete(delete_post))
        .route("/posts/:id/like", post(like_post))
        .route("/posts/:id/unlike", post(unlike_post))
        .route("/users/:id/posts", get(posts_by_user))
}

/// POST /posts
async fn create_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<PostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let post = PostService::create(state.db(), auth_user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /posts
async fn feed(State(state): State<AppState>, auth_user: AuthUser) -> ApiResult<Json<Vec<PostResponse>>> {
    let posts = PostService::feed(state.db(), auth_user.user_id).await?;
    Ok(Json(posts))
}

/// GET /posts/:id
async fn get_post(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Json<PostResponse>> {
    let post = PostService::get(state.db(), id).await?;
    Ok(Json(post))
}

/// GET /users/:id/posts
async fn posts_by_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let posts = PostService::by_author(state.db(), id).await?;
    Ok(Json(posts))
}

/// PUT /posts/:id
async fn update_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<u64>,
    Json(req): Json<PostRequest>,
) -> ApiResult<StatusCode> {
    PostService::update(state.db(), auth_user.user_id, id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /posts/:id
async fn delete_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    PostService::delete(state.db(), auth_user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /posts/:id/like
async fn like_post(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<StatusCode> {
    PostService::like(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /posts/:id/unlike
async fn unlike_post(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<StatusCode> {
    PostService::unlike(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
