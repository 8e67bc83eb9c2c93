//! The `studyhub` library crate.
//!
//! Contains the domain models, authentication and session machinery, route
//! handlers, configuration, and error handling for the studyhub web
//! application. The binary (`main.rs`) uses it to construct and run the
//! server; the integration tests assemble the same app in-process.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
