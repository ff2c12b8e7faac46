//! Login route
//!
//! A successful login answers with the bare token as the response body.

use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use devbook_shared::LoginRequest;

/// Create login routes
pub fn login_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Exchange email and password for an access token
///
/// POST /login
async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> ApiResult<String> {
    UserService::login(state.db(), state.tokens(), req).await
}
