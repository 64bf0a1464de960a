use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("resource not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Unprocessable(#[from] Unprocessable),
}

// the cause is only logged, every variant renders the same 422 body
#[derive(Debug, Error)]
pub enum Unprocessable {
    /// Absent or malformed input.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Row to be mutated does not exist.
    #[error("question {0} does not exist")]
    Missing(i64),

    #[error("store error: {0}")]
    Store(#[source] sqlx::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "Bad request",
            ApiError::NotFound => "Resource not found",
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::Unprocessable(_) => "Unprocessable",
        }
    }

    /// For endpoints where any body problem is unprocessable input.
    pub fn unprocessable_body(rejection: JsonRejection) -> Self {
        Unprocessable::Validation(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Unprocessable(Unprocessable::Store(e)) => {
                tracing::error!("Store error: {e}")
            }
            ApiError::Unprocessable(cause) => tracing::warn!("Unprocessable: {cause}"),
            ApiError::BadRequest(reason) => tracing::info!("Bad request: {reason}"),
            ApiError::NotFound | ApiError::MethodNotAllowed => {}
        }

        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Unprocessable {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(e)
                if matches!(
                    e.kind(),
                    ErrorKind::NotNullViolation
                        | ErrorKind::UniqueViolation
                        | ErrorKind::ForeignKeyViolation
                        | ErrorKind::CheckViolation
                ) =>
            {
                Unprocessable::Constraint(e.message().to_owned())
            }
            _ => Unprocessable::Store(error),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            error => ApiError::Unprocessable(error.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // well-formed JSON with wrong field types
            JsonRejection::JsonDataError(e) => Unprocessable::Validation(e.body_text()).into(),
            rejection => ApiError::BadRequest(rejection.body_text()),
        }
    }
}
