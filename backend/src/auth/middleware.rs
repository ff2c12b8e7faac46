//! Authentication middleware
//!
//! [`require_auth`] gates protected routes: it verifies the bearer token and
//! either short-circuits with 401 or hands the request to `next`
//! untouched. It does not attach the principal to the request. Handlers
//! that need the caller's identity take an [`AuthUser`], which parses and
//! verifies the token again on its own. Both checks are pure and
//! idempotent, so the repetition costs one extra HMAC per request.

use super::token::{bearer_token, UserId};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Token presented in the `Authorization` header, or `""` if there is none
pub fn token_from_headers(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(bearer_token)
        .unwrap_or_default()
}

/// Reject requests without a valid access token before they reach a handler.
///
/// Apply with `axum::middleware::from_fn_with_state` as a `route_layer`.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    state.tokens().verify(token_from_headers(request.headers()))?;
    Ok(next.run(request).await)
}

/// Authenticated caller, decoded from the bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user_id = app_state
            .tokens()
            .extract_principal(token_from_headers(&parts.headers))?;

        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), "");

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(token_from_headers(&headers), "abc.def.ghi");

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer a b"));
        assert_eq!(token_from_headers(&headers), "");
    }

    #[test]
    fn test_non_ascii_header_yields_empty_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap());
        assert_eq!(token_from_headers(&headers), "");
    }

    #[test]
    fn test_auth_user_debug() {
        let user = AuthUser { user_id: 42 };
        let debug_str = format!("{:?}", user);
        assert!(debug_str.contains("AuthUser"));
    }
}
