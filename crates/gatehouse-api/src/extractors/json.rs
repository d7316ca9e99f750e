//! JSON body extractor that runs `validator` rules.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use gatehouse_core::error::AppError;

/// Like `Json<T>`, but rejects with `BadParameters` and validates the body.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;
        value.validate().map_err(validation_to_error)?;
        Ok(Self(value))
    }
}

/// Maps an axum JSON rejection to `BadParameters`.
pub(crate) fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(_) => {
            AppError::bad_parameters("Parameters must be of type String")
        }
        JsonRejection::JsonSyntaxError(_) => AppError::bad_parameters("Malformed JSON body"),
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_parameters("Expected a JSON body")
        }
        other => AppError::bad_parameters(other.body_text()),
    }
}

fn validation_to_error(errors: ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid parameters".to_string());
    AppError::bad_parameters(message)
}
