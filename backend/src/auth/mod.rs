//! Authentication and request authorization
//!
//! Stateless HMAC-signed bearer tokens, argon2 password hashing, the
//! request gate for protected routes, and per-resource ownership checks.

mod guard;
mod middleware;
mod password;
mod token;

pub use guard::{ensure_not_self, ensure_owner, ensure_self, GuardError, OwnerLookup};
pub use middleware::{require_auth, token_from_headers, AuthUser};
pub use password::{CredentialError, PasswordService};
pub use token::{bearer_token, Claims, TokenError, TokenService, UserId, MAX_SAFE_INTEGER};
