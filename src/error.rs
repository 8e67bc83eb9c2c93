//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management for everything that is not a
//! form-level validation problem (those are re-rendered inline by the
//! handlers and never become an `AppError`).
//!
//! `AppError` implements `actix_web::error::ResponseError` so handler errors
//! become HTML error pages. Infrastructure failures (database, hashing,
//! templating) are logged server-side and surfaced to the client as a
//! generic page with no detail.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// A session token failed verification (HTTP 401).
    /// The access guard normally intercepts this and redirects instead.
    Unauthorized(String),
    /// A requested record was not found (HTTP 404).
    NotFound(String),
    /// An unexpected server-side failure, e.g. hashing or token signing (HTTP 500).
    InternalServerError(String),
    /// An error originating from database operations (HTTP 500).
    /// Wraps errors from the `sqlx` crate.
    DatabaseError(String),
    /// A template failed to render (HTTP 500).
    /// Wraps errors from the `askama` crate.
    Template(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::Template(msg) => write!(f, "Template Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into HTML error responses.
///
/// Server-side failure detail stays in the log; the client only ever sees
/// the generic page for 500-class errors.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_)
            | AppError::DatabaseError(_)
            | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("{}", self);
        }
        let body = match status {
            StatusCode::UNAUTHORIZED => "<h1>401 Unauthorized</h1>",
            StatusCode::NOT_FOUND => "<h1>404 Not Found</h1>",
            _ => "<h1>500 Server Error</h1><p>Something went wrong. Please try again later.</p>",
        };
        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body)
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` becomes `AppError::NotFound`, everything else
/// becomes `AppError::DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `askama::Error` into `AppError::Template`.
impl From<askama::Error> for AppError {
    fn from(error: askama::Error) -> AppError {
        AppError::Template(error.to_string())
    }
}
