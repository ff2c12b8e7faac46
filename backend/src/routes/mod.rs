//! Route definitions for the Devbook API
//!
//! Health checks, registration and login are public. Everything else sits
//! behind the [`require_auth`] gate.

use crate::auth::require_auth;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub mod extract;
mod health;
mod login;
mod posts;
mod users;


pub use login::login_routes;
pub use posts::post_routes;
pub use users::{protected_user_routes, public_user_routes};

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Routes reachable without a token
fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(login::login_routes())
        .merge(users::public_user_routes())
}

/// Routes that only run after the gate has accepted the bearer token
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(users::protected_user_routes())
        .merge(posts::post_routes())
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
