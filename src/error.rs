//! Shell error type and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

use crate::api::responses::ErrorResponse;
use crate::state::TransitionError;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to lock session state: {0}")]
    StateLock(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl IntoResponse for ShellError {
    fn into_response(self) -> Response {
        let status = match &self {
            ShellError::Transition(_) => StatusCode::CONFLICT,
            ShellError::StateLock(_) => {
                error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
