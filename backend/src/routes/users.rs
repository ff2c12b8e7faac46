//! User routes
//!
//! Registration is public. Reading, editing and the follow graph require
//! a token; edits are further restricted to the account owner.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::extract::Path;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use devbook_shared::{CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest, UserResponse, UserSearchQuery};

/// Routes that do not require a token
pub fn public_user_routes() -> Router<AppState> {
    Router::new().route("/users", post(create_user))
}

/// Routes mounted behind the auth gate
pub fn protected_user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(search_users))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/users/:id/update-password", post(update_password))
        .route("/users/:id/follow", post(follow_user))
        .route("/users/:id/unfollow", post(unfollow_user))
        .route("/users/:id/followers", get(followers))
        .route("/users/:id/following", get(following))
}

/// Register a new user
///
/// POST /users
async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = UserService::register(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users?user=<name or nick>
async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = UserService::search(state.db(), query.user.as_deref()).await?;
    Ok(Json(users))
}

/// GET /users/:id
async fn get_user(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Json<UserResponse>> {
    let user = UserService::get(state.db(), id).await?;
    Ok(Json(user))
}

/// PUT /users/:id
async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<u64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<StatusCode> {
    UserService::update(state.db(), auth_user.user_id, id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/:id
async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    UserService::delete(state.db(), auth_user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /users/:id/update-password
async fn update_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<u64>,
    Json(req): Json<UpdatePasswordRequest>,
) -> ApiResult<StatusCode> {
    UserService::update_password(state.db(), auth_user.user_id, id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /users/:id/follow
async fn follow_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    UserService::follow(state.db(), auth_user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /users/:id/unfollow
async fn unfollow_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    UserService::unfollow(state.db(), auth_user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/:id/followers
async fn followers(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = UserService::followers(state.db(), id).await?;
    Ok(Json(users))
}

/// GET /users/:id/following
async fn following(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = UserService::following(state.db(), id).await?;
    Ok(Json(users))
}
