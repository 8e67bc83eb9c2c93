use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{
    error::ResponseError, Error as ActixError, FromRequest, HttpRequest, HttpResponse,
};
use std::fmt;
use std::future::{ready, Ready};

use crate::auth::session::{verify_token, SESSION_COOKIE};

/// Rejection raised when a guarded page is requested without a valid
/// session. The response is a redirect to the login form, not an error
/// page — being signed out is an expected state, not a failure.
#[derive(Debug)]
pub struct NotAuthenticated;

impl fmt::Display for NotAuthenticated {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "not authenticated")
    }
}

impl ResponseError for NotAuthenticated {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/login/"))
            .finish()
    }
}

/// The identity bound to the current request's session cookie.
///
/// Adding this extractor to a handler's arguments is what guards the page:
/// a request with a missing, tampered, or expired session never reaches the
/// handler body. The identity is an explicit argument, never ambient state.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req
            .cookie(SESSION_COOKIE)
            .and_then(|cookie| verify_token(cookie.value()).ok());

        match claims {
            Some(claims) => ready(Ok(CurrentUser {
                id: claims.sub,
                username: claims.username,
            })),
            None => ready(Err(NotAuthenticated.into())),
        }
    }
}
