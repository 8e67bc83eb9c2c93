pub mod credentials;
pub mod extractors;
pub mod password;
pub mod session;

use lazy_static::lazy_static;
use serde::Deserialize;
use validator::Validate;

// Re-export necessary items
pub use credentials::verify_credentials;
pub use extractors::{CurrentUser, NotAuthenticated};
pub use password::{hash_password, verify_password};
pub use session::{issue_token, removal_cookie, session_cookie, verify_token, Claims};

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Form body submitted by the login page.
///
/// Deliberately carries no format rules: any credentials that do not match
/// a stored account collapse into the one generic failure message, so the
/// response never distinguishes an unknown user from a wrong password.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Form body submitted by the registration page.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    /// Desired username for the new account.
    /// Must be between 3 and 32 characters, alphanumeric, underscores, or hyphens.
    #[validate(
        length(min = 3, max = 32, message = "Username must be between 3 and 32 characters"),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    /// Password for the new account.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// First human-readable message out of a validation failure, for inline
/// display above the re-rendered form.
pub fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .filter_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Invalid input.".to_string())
}
