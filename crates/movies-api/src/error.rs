use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use movies_core::{CoreError, StoreError};
use tracing::{debug, error};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures a handler can return.
///
/// | error | status |
/// |---|---|
/// | `InvalidInput` | 400 |
/// | `Store(NotFound)` | 404 |
/// | `Store(DuplicateKey)` | 409 |
/// | any other `Store` error | 500 |
#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<CoreError> for AppError {
    fn from(value: CoreError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::InvalidInput(value.body_text())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::DuplicateKey(_)) => StatusCode::CONFLICT,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (status_text, detail) = match self {
            AppError::InvalidInput(message) => {
                debug!(error = %message, "rejecting invalid request");
                ("Bad request", Some(message))
            }
            AppError::Store(err @ StoreError::NotFound(_)) => {
                debug!(error = %err, "movie not found");
                ("Resource not found.", None)
            }
            AppError::Store(err @ StoreError::DuplicateKey(_)) => {
                debug!(error = %err, "duplicate movie id");
                ("Duplicate Key", Some(err.to_string()))
            }
            AppError::Store(err) => {
                error!(error = %err, transient = err.is_transient(), "store operation failed");
                ("Internal Server Error", None)
            }
        };

        let body = ErrorResponse {
            status: status_text.to_string(),
            error: detail,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movies_core::MovieId;

    #[test]
    fn status_mapping() {
        let id = MovieId::new_v4();
        assert_eq!(
            AppError::InvalidInput("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(StoreError::NotFound(id)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(StoreError::DuplicateKey(id)).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(StoreError::Timeout("get_all".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(StoreError::Query("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_movie_id_is_a_bad_request() {
        let err = MovieId::parse("nope").unwrap_err();
        assert_eq!(AppError::from(err).status_code(), StatusCode::BAD_REQUEST);
    }
}
