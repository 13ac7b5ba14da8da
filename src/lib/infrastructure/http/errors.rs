//! API error-handling module

use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::communication::emails::{BuildEmailError, SendEmailError, ValidationError};

/// Error code for requests that fail binding or validation
pub const PAYLOAD_INVALID_CODE: &str = "ERR_CCG_SERVICE_PAYLOAD_INVALID";

/// Error message for requests that fail binding or validation
pub const PAYLOAD_INVALID_MESSAGE: &str =
    "One or more of the request parameters are missing or invalid";

/// Error code for failures on the gateway's side
pub const INTERNAL_SERVER_ERROR_CODE: &str = "ERR_CCG_SERVICE_INTERNAL_SERVER_ERROR";

/// Error message for failures on the gateway's side
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "something went wrong";

/// An error response
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine readable error code
    #[schema(example = "ERR_CCG_SERVICE_PAYLOAD_INVALID")]
    pub error_code: String,

    /// Human readable error message
    #[schema(example = "One or more of the request parameters are missing or invalid")]
    pub error_message: String,
}

impl ErrorResponse {
    /// The body sent for internal errors
    pub fn internal_server_error() -> Self {
        Self {
            error_code: INTERNAL_SERVER_ERROR_CODE.to_string(),
            error_message: INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
        }
    }
}

/// An error raised in the API
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApiError {
    /// The status code
    #[schema(example = 400, value_type = u16)]
    #[serde(with = "http_serde::status_code")]
    pub status: StatusCode,

    /// The error code
    #[schema(example = "ERR_CCG_SERVICE_PAYLOAD_INVALID")]
    pub code: String,

    /// The error message
    #[schema(example = "One or more of the request parameters are missing or invalid")]
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    /// The request could not be bound or failed validation
    pub fn payload_invalid() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            PAYLOAD_INVALID_CODE,
            PAYLOAD_INVALID_MESSAGE,
        )
    }

    /// Something failed on our side
    pub fn internal_server_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_SERVER_ERROR_CODE,
            INTERNAL_SERVER_ERROR_MESSAGE,
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error_code: self.code,
                error_message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        debug!("anyhow::Error -> ApiError: {err:?}");

        ApiError::internal_server_error()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("JsonRejection -> ApiError: {}", rejection.body_text());

        ApiError::payload_invalid()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        debug!("ValidationError -> ApiError: {err}");

        ApiError::payload_invalid()
    }
}

impl From<BuildEmailError> for ApiError {
    fn from(err: BuildEmailError) -> Self {
        debug!("BuildEmailError -> ApiError: {err}");

        ApiError::payload_invalid()
    }
}

impl From<SendEmailError> for ApiError {
    fn from(err: SendEmailError) -> Self {
        debug!("SendEmailError -> ApiError: {err}");

        ApiError::internal_server_error()
    }
}
