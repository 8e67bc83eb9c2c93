use crate::auth::password::verify_password;
use crate::error::AppError;
use crate::models::User;
use sqlx::PgPool;

/// Looks up `username` and checks `password` against the stored bcrypt hash.
///
/// Unknown usernames and wrong passwords are both `Ok(None)` — normal,
/// expected outcomes. Only infrastructure failures (database errors, a
/// malformed stored digest) are `Err`.
pub async fn verify_credentials(
    pool: &PgPool,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    if let Some(user) = user {
        if verify_password(password, &user.password_hash)? {
            return Ok(Some(user));
        }
    }
    Ok(None)
}
