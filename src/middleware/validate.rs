use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::validation::{self, Validate};

/// JSON body extractor that runs `T::RULES` before the handler sees a typed `T`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(request, state)
            .await
            .map_err(invalid_json)?;

        validation::validate::<T>(body)
            .map(ValidatedJson)
            .map_err(|violations| {
                tracing::debug!("Request body failed validation with {} violation(s)", violations.len());
                ApiError::validation_error(violations)
            })
    }
}

fn invalid_json(rejection: JsonRejection) -> ApiError {
    // Bodies over DefaultBodyLimit fail while buffering
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large(rejection.body_text());
    }
    ApiError::invalid_json(rejection.body_text())
}
