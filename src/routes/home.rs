use crate::{auth::CurrentUser, error::AppError, routes::html};
use actix_web::{get, Responder};
use askama::Template;

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    username: String,
}

/// The guarded landing page.
///
/// `CurrentUser` is the access guard: a request without a valid session is
/// redirected to `/login/` before this body runs.
#[get("/")]
pub async fn home(user: CurrentUser) -> Result<impl Responder, AppError> {
    let body = HomeTemplate {
        username: user.username,
    }
    .render()?;
    Ok(html(body))
}
