//! Expense Parser Server
//!
//! Provides the HTTP endpoints for expense parsing and health reporting.

pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    fn kind(&self) -> &'static str {
        match self {
            ServerError::InvalidRequest(_) => "validation_error",
            ServerError::Internal(_) => "internal_error",
        }
    }

    fn detail(&self) -> &str {
        match self {
            ServerError::InvalidRequest(detail) | ServerError::Internal(detail) => detail,
        }
    }
}

impl From<expense_parser_core::Error> for ServerError {
    fn from(err: expense_parser_core::Error) -> Self {
        match err {
            expense_parser_core::Error::Validation(detail) => ServerError::InvalidRequest(detail),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.kind(),
            "detail": self.detail(),
        }));
        let status: StatusCode = self.into();
        (status, body).into_response()
    }
}
