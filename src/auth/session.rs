//! Session binding.
//!
//! A verified identity is attached to the browser as a signed HS256 claims
//! object carried in an `HttpOnly` cookie. Handlers receive it back through
//! the `CurrentUser` extractor; nothing about the signed-in user is kept in
//! process-global state.

use crate::error::AppError;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE: &str = "studyhub_session";

/// Session lifetime. Token expiry and cookie max-age use the same value.
const SESSION_HOURS: i64 = 24;

/// Claims encoded in a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account id of the signed-in user.
    pub sub: i32,
    /// Username, carried so pages can greet the user without a lookup.
    pub username: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

fn session_secret() -> Result<String, AppError> {
    std::env::var("SESSION_SECRET")
        .map_err(|_| AppError::InternalServerError("SESSION_SECRET not set".into()))
}

/// Signs a session token for a freshly verified identity.
///
/// Requires the `SESSION_SECRET` environment variable.
pub fn issue_token(user_id: i32, username: &str) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(SESSION_HOURS))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: expiration,
    };

    let secret = session_secret()?;
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to sign session token: {}", e)))
}

/// Verifies a session token and decodes its claims.
///
/// A malformed, tampered, or expired token is `AppError::Unauthorized`; the
/// access guard turns that into a redirect to the login page.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let secret = session_secret()?;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid session token: {}", e)))
}

/// Builds the cookie that binds `token` to the browser.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::hours(SESSION_HOURS))
        .finish()
}

/// Builds the removal cookie that destroys the session on logout.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}
