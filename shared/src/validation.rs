//! Input validation functions
//!
//! Every accepted value is trimmed before it is checked, and the trimmed
//! form is what gets persisted.

use crate::errors::ValidationError;
use validator::ValidateEmail;

/// Which flow the user fields are being prepared for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStep {
    Create,
    Update,
}

/// Normalised user profile fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub name: String,
    pub nick: String,
    pub email: String,
}

/// Normalised post fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub content: String,
}

/// Trim a value and reject it when nothing is left
pub fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(
            field,
            format!("{} is required and cannot be blank", field),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.len() > 255 {
        return Err(ValidationError::new("email", "Email too long"));
    }
    if !email.validate_email() {
        return Err(ValidationError::new("email", "email is invalid"));
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new(
            "password",
            "password is required and cannot be blank",
        ));
    }
    if password.chars().count() < 8 {
        return Err(ValidationError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    if password.len() > 128 {
        return Err(ValidationError::new("password", "Password too long"));
    }
    Ok(())
}

/// Validate and normalise the profile fields of a user.
///
/// On [`UserStep::Create`] the password must also be supplied and pass
/// [`validate_password`]; it is never trimmed.
pub fn prepare_user(
    name: &str,
    nick: &str,
    email: &str,
    password: Option<&str>,
    step: UserStep,
) -> Result<UserFields, ValidationError> {
    let name = require("name", name)?;
    let nick = require("nick", nick)?;
    let email = require("email", email)?;
    validate_email(&email)?;

    if step == UserStep::Create {
        validate_password(password.unwrap_or_default())?;
    }

    Ok(UserFields { name, nick, email })
}

/// Validate and normalise a post
pub fn prepare_post(title: &str, content: &str) -> Result<PostFields, ValidationError> {
    Ok(PostFields {
        title: require("title", title)?,
        content: require("content", content)?,
    })
}
