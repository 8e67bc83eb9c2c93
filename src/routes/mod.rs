pub mod auth;
pub mod health;
pub mod home;
pub mod tasks;
pub mod topics;

use actix_web::{web, HttpResponse};

/// Registers the full route table. Trailing slashes are part of the paths
/// and are preserved from the original URL layout.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(home::home)
        .service(auth::login_page)
        .service(auth::login_submit)
        .service(auth::register_page)
        .service(auth::register_submit)
        .service(auth::logout)
        .service(tasks::task_list)
        .service(topics::topic_list)
        .service(health::health);
}

/// Wraps a rendered template body in a 200 HTML response.
pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}
