//! JSON body extractor that validates and reports errors in the API envelope.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use validator::{Validate, ValidationErrors};

use blogdesk_core::error::AppError;

use crate::error::ApiError;

/// `Json<T>` that runs `validator` rules after deserializing.
///
/// Malformed bodies are 400 `BAD_REQUEST`; rule violations are 422 with the
/// offending fields in `details`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate().map_err(validation_error)?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    AppError::bad_request(format!("Invalid JSON body: {}", rejection.body_text())).into()
}

/// Collapse `validator` errors into `{ field: [messages] }`.
pub fn validation_error(errors: ValidationErrors) -> ApiError {
    let mut fields = Map::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<Value> = errs
            .iter()
            .map(|e| match &e.message {
                Some(msg) => Value::String(msg.to_string()),
                None => Value::String(format!("{field} is invalid ({})", e.code)),
            })
            .collect();
        fields.insert(field.to_string(), Value::Array(messages));
    }

    let first = fields
        .values()
        .filter_map(|v| v.as_array().and_then(|a| a.first()).and_then(Value::as_str))
        .next()
        .unwrap_or("Validation failed")
        .to_string();

    AppError::validation(first)
        .with_details(json!({ "fields": Value::Object(fields) }))
        .into()
}
