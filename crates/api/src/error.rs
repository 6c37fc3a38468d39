//! HTTP error type.
//!
//! Every error renders as `{"error": {"message": ..., "status": ...}}`.
//! Storage failures are logged and reported without detail.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Db(#[from] DbError),

    /// Malformed body or query string.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Db(DbError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            Self::Db(DbError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Db(DbError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::Db(DbError::InvalidRequest(msg))
            | Self::Db(DbError::NotFound(msg))
            | Self::Db(DbError::Conflict(msg)) => msg.clone(),
            Self::Db(_) => "Internal Server Error".to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = json!({
            "error": {
                "message": self.message(),
                "status": status.as_u16(),
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_errors_map_to_statuses() {
        let cases = [
            (DbError::InvalidRequest("No data".into()), StatusCode::BAD_REQUEST),
            (DbError::NotFound("No job: j1".into()), StatusCode::NOT_FOUND),
            (DbError::Conflict("Duplicate job: j1".into()), StatusCode::CONFLICT),
            (DbError::Sqlx(sqlx_error()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::from(DbError::Sqlx(sqlx_error()));
        assert_eq!(err.message(), "Internal Server Error");
    }

    fn sqlx_error() -> sqlx::Error {
        sqlx::Error::RowNotFound
    }
}
