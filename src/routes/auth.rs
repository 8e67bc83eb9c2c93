use crate::{
    auth::{
        first_validation_message, hash_password, issue_token, removal_cookie, session_cookie,
        verify_credentials, LoginForm, RegisterForm,
    },
    error::AppError,
    routes::html,
};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use askama::Template;
use sqlx::PgPool;
use validator::Validate;

/// One generic message for every failed login. Never reveals whether the
/// username exists.
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";

const DUPLICATE_USERNAME_MESSAGE: &str = "That username is already taken.";

const REGISTERED_MESSAGE: &str = "Account created successfully! You can now log in.";

/// Cookie carrying a one-shot notice across the register -> login redirect.
/// The value is a short code (cookie values must not contain spaces); the
/// login page maps it back to the full message.
const FLASH_COOKIE: &str = "studyhub_flash";

const FLASH_REGISTERED: &str = "registered";

fn flash_message(code: &str) -> Option<&'static str> {
    match code {
        FLASH_REGISTERED => Some(REGISTERED_MESSAGE),
        _ => None,
    }
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error_message: Option<String>,
    flash: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    error_message: Option<String>,
}

fn flash_cookie(code: &str) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, code.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn flash_removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(FLASH_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// Renders the login form.
///
/// A pending flash message (set by a successful registration) is displayed
/// once and its cookie cleared.
#[get("/login/")]
pub async fn login_page(req: HttpRequest) -> Result<impl Responder, AppError> {
    let pending = req.cookie(FLASH_COOKIE);
    let flash = pending
        .as_ref()
        .and_then(|c| flash_message(c.value()))
        .map(String::from);
    let had_flash = pending.is_some();

    let body = LoginTemplate {
        error_message: None,
        flash,
    }
    .render()?;

    let mut builder = HttpResponse::Ok();
    builder.content_type("text/html; charset=utf-8");
    if had_flash {
        builder.cookie(flash_removal_cookie());
    }
    Ok(builder.body(body))
}

/// Handles a login submission.
///
/// Verified credentials bind a session and redirect to the home page.
/// Anything else re-renders the form with the generic failure message.
#[post("/login/")]
pub async fn login_submit(
    pool: web::Data<PgPool>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    match verify_credentials(pool.get_ref(), &form.username, &form.password).await? {
        Some(user) => {
            let token = issue_token(user.id, &user.username)?;
            log::info!("session opened for user {}", user.id);
            Ok(HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/"))
                .cookie(session_cookie(token))
                .finish())
        }
        None => {
            let body = LoginTemplate {
                error_message: Some(INVALID_CREDENTIALS_MESSAGE.to_string()),
                flash: None,
            }
            .render()?;
            Ok(html(body))
        }
    }
}

/// Renders the registration form.
#[get("/register/")]
pub async fn register_page() -> Result<impl Responder, AppError> {
    let body = RegisterTemplate {
        error_message: None,
    }
    .render()?;
    Ok(html(body))
}

/// Handles a registration submission.
///
/// Creates the account with a hashed credential and redirects to the login
/// page with a confirmation notice. Invalid input and duplicate usernames
/// re-render the form with the message; a duplicate is never a crash.
#[post("/register/")]
pub async fn register_submit(
    pool: web::Data<PgPool>,
    form: web::Form<RegisterForm>,
) -> Result<impl Responder, AppError> {
    if let Err(errors) = form.validate() {
        let body = RegisterTemplate {
            error_message: Some(first_validation_message(&errors)),
        }
        .render()?;
        return Ok(html(body));
    }

    // Check if the username already exists
    let existing = sqlx::query("SELECT id FROM users WHERE username = $1")
        .bind(&form.username)
        .fetch_optional(pool.get_ref())
        .await?;

    if existing.is_some() {
        let body = RegisterTemplate {
            error_message: Some(DUPLICATE_USERNAME_MESSAGE.to_string()),
        }
        .render()?;
        return Ok(html(body));
    }

    let password_hash = hash_password(&form.password)?;

    let insert = sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
        .bind(&form.username)
        .bind(&password_hash)
        .execute(pool.get_ref())
        .await;

    if let Err(error) = insert {
        // Two registrations can race past the pre-check; the unique
        // constraint decides, and the loser sees the same validation error.
        if is_unique_violation(&error) {
            let body = RegisterTemplate {
                error_message: Some(DUPLICATE_USERNAME_MESSAGE.to_string()),
            }
            .render()?;
            return Ok(html(body));
        }
        return Err(error.into());
    }

    log::info!("account created for username {:?}", form.username);
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login/"))
        .cookie(flash_cookie(FLASH_REGISTERED))
        .finish())
}

/// Destroys the session and returns to the login page.
#[post("/logout/")]
pub async fn logout() -> impl Responder {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login/"))
        .cookie(removal_cookie())
        .finish()
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}
