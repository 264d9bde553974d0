use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Validation: {0}")]
    Validation(String),
    #[error("Service Unavailable: {0}")]
    Unavailable(String),
    #[error("Internal Error: {0}")]
    Internal(String),
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Translate an error raised while writing `entity` rows.
    ///
    /// Uniqueness violations become conflicts and other constraint
    /// violations are bad requests. Both answer 400. Anything else stays a
    /// server-side database error.
    pub fn classify(entity: &str, err: sqlx::Error) -> AppError {
        let kind = match &err {
            sqlx::Error::Database(db_err) => Some(db_err.kind()),
            _ => None,
        };
        match kind {
            Some(ErrorKind::UniqueViolation) => {
                AppError::Conflict(format!("{entity} already exists. Check parameters"))
            }
            Some(ErrorKind::ForeignKeyViolation)
            | Some(ErrorKind::NotNullViolation)
            | Some(ErrorKind::CheckViolation) => {
                let reason = match &err {
                    sqlx::Error::Database(db_err) => db_err.message().to_string(),
                    _ => String::new(),
                };
                AppError::BadRequest(format!("{entity} rejected by the database: {reason}"))
            }
            _ => AppError::Database(err),
        }
    }

    /// [`AppError::classify`] for inserts. Failures that are not constraint
    /// violations are still reported to the caller as a bad request.
    pub fn classify_create(entity: &str, err: sqlx::Error) -> AppError {
        match Self::classify(entity, err) {
            AppError::Database(err) => {
                tracing::error!("Creating {entity} failed: {err}");
                AppError::BadRequest(format!("Could not create {entity}. Something was wrong"))
            }
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Validation(msg) => msg.clone(),
            AppError::Unavailable(msg) => {
                tracing::warn!("Service unavailable: {msg}");
                "Service temporarily unavailable".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                "Internal server error".to_string()
            }
        };

        let body = json!({ "detail": detail });
        (status, axum::Json(body)).into_response()
    }
}
