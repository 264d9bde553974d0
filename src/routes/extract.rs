//! Request extractors whose rejections use the API's `{"detail": ...}` body.
//!
//! `ValidatedJson<T>` works like `axum::Json<T>` but also runs
//! `validator::Validate::validate()` on the payload, so invalid bodies are
//! rejected before any handler code (and any database work) runs.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// Rejection of a stock axum extractor, keeping its status and message.
#[derive(Debug)]
pub struct ExtractRejection {
    pub status: StatusCode,
    pub detail: String,
}

impl From<JsonRejection> for ExtractRejection {
    fn from(rejection: JsonRejection) -> Self {
        ExtractRejection {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ExtractRejection {
    fn from(rejection: PathRejection) -> Self {
        ExtractRejection {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ExtractRejection {
    fn from(rejection: QueryRejection) -> Self {
        ExtractRejection {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ExtractRejection {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ExtractRejection))]
pub struct Path<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ExtractRejection))]
pub struct Query<T>(pub T);

pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    /// Body missing, not JSON, or not shaped like `T`.
    Json(JsonRejection),
    /// Body parsed but broke a field rule.
    Invalid(ValidationErrors),
}

/// Flatten field errors into `field: message` pairs, sorted for stable output.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {msg}")
            })
        })
        .collect();
    messages.sort();

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Json(rejection) => ExtractRejection::from(rejection).into_response(),
            Self::Invalid(errors) => AppError::Validation(describe(&errors)).into_response(),
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;

        value.validate().map_err(ValidatedJsonRejection::Invalid)?;

        Ok(ValidatedJson(value))
    }
}
