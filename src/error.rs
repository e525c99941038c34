use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub const ERR_TODO_REQ_BODY: &str =
    "invalid request body, please include a text field with non-zero length";
pub const ERR_USER_REQ_BODY: &str = "invalid request body, must have a uname and pass field";
pub const ERR_INVALID_ID: &str = "invalid id";
pub const ERR_INTERNAL: &str = "please try again later";
pub const ERR_AUTH: &str = "could not authenticate user";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("todo request body is missing a non-empty text field")]
    InvalidTodoBody,

    #[error("user request body is missing uname or pass")]
    InvalidUserBody,

    #[error("record not found or not owned by the caller")]
    NotFound,

    #[error("request carries no valid session")]
    Unauthenticated,

    #[error("unexpected store outcome: {0}")]
    Internal(String),

    #[error("sqlx error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidTodoBody | Self::InvalidUserBody => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Internal(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The fixed body sent to the client. Internal detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidTodoBody => ERR_TODO_REQ_BODY,
            Self::InvalidUserBody => ERR_USER_REQ_BODY,
            Self::NotFound => ERR_INVALID_ID,
            Self::Unauthenticated => ERR_AUTH,
            Self::Internal(_) | Self::Database(_) => ERR_INTERNAL,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!("Generating response for AppError: {:?}", self);
        } else {
            tracing::debug!("Generating response for AppError: {}", self);
        }

        (status_code, self.public_message()).into_response()
    }
}
