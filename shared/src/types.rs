//! API request and response types

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Login request
///
/// The password is held as a secret so it never shows up in `Debug` output.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub current: SecretString,
    pub new: SecretString,
}

// ============================================================================
// User Types
// ============================================================================

/// Registration request
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub nick: String,
    pub email: String,
    pub password: SecretString,
}

/// Profile update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub nick: String,
    pub email: String,
}

/// Query string for user search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSearchQuery {
    /// Matched against name and nick, case-insensitive
    #[serde(default)]
    pub user: Option<String>,
}

/// Public user representation (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: u64,
    pub name: String,
    pub nick: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Post Types
// ============================================================================

/// Post create/update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
}

/// Post response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostResponse {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author_id: u64,
    pub author_nick: String,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}
