//! Extractors whose rejections use the API error body

use crate::error::ApiError;
use axum::extract::FromRequestParts;

/// Path parameters; a malformed segment is a JSON 400 instead of axum's plain text
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);
