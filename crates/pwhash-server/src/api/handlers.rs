//! Route handlers. Each one translates HTTP into one `TaskManager` call and
//! the result back into a status code.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use pwhash_core::{Stats, TaskId};
use serde::Deserialize;

use super::error::ApiError;
use super::routes::AppState;

const PASSWORD_FIELD: &str = "password";

#[derive(Debug, Deserialize)]
pub(crate) struct NewHashForm {
    password: Option<String>,
}

/// `POST /hash` with form field `password`. Responds `201` with the new id.
pub(crate) async fn new_hash(
    State(state): State<Arc<AppState>>,
    form: Result<Form<NewHashForm>, FormRejection>,
) -> Result<(StatusCode, String), ApiError> {
    let Form(form) = form.map_err(|e| ApiError::InvalidForm(e.body_text()))?;
    let password = form
        .password
        .ok_or(ApiError::MissingField(PASSWORD_FIELD))?;

    let id = state.manager.submit(password).await?;
    Ok((StatusCode::CREATED, id.to_string()))
}

/// `GET /hash/{id}`. Malformed ids never reach the manager.
pub(crate) async fn check_hash(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<String, ApiError> {
    let id: TaskId = raw.parse()?;

    match state.manager.status(id).await {
        Ok(digest) => Ok(digest),
        // TODO: derive the hint from the task's start time instead of the full delay
        Err(e) if e.is_retryable() => Err(ApiError::NotReady {
            retry_after: state.retry_after,
        }),
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<Stats>, ApiError> {
    Ok(Json(state.manager.stats().await?))
}

/// `POST /shutdown`. Answers right away; draining and stopping the server
/// happen in the background.
pub(crate) async fn shutdown(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.manager.shutdown().await?;

    let background = Arc::clone(&state);
    tokio::spawn(async move {
        background.drain_and_stop().await;
    });

    Ok(StatusCode::OK)
}
