//! pwhash-server
//!
//! HTTP front end for the pwhash task manager.
//!
//! - **api**: axum routes under `/api/v1`, request ids, error mapping, shutdown
//! - **logging**: tracing subscriber setup from the config file

pub mod api;
pub mod logging;

pub use api::{ApiError, AppState, Server, ServerError};
