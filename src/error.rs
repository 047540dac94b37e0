use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Body of the `403` sent to a locked out client.
pub const LOCKOUT_MESSAGE: &str =
    "max authentication count exceeds, please try again in one minute!";

/// Challenge sent with every `401`.
pub const BASIC_AUTH_CHALLENGE: &str = "Basic realm=\"Swagger\"";

/// Error response returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: &'static str,
    /// Human-readable error message
    pub message: &'static str,
}

#[derive(Error, Debug)]
pub enum SwaggerError {
    #[error("max authentication count exceeds, please try again in one minute!")]
    AuthLockout,

    #[error("Missing basic authentication credentials")]
    MissingCredentials,

    #[error("Invalid basic authentication credentials")]
    InvalidCredentials,

    #[error("Failed to read swagger document: {0}")]
    DocumentRead(#[from] std::io::Error),

    #[error("Malformed swagger document: {0}")]
    DocumentParse(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid swagger configuration: {0}")]
    InvalidConfig(String),
}

impl IntoResponse for SwaggerError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            SwaggerError::AuthLockout => {
                return (
                    StatusCode::FORBIDDEN,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    LOCKOUT_MESSAGE,
                )
                    .into_response();
            }
            SwaggerError::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                "missing_credentials",
                "Missing basic authentication credentials",
            ),
            SwaggerError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid basic authentication credentials",
            ),
            SwaggerError::DocumentRead(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "document_read_error",
                "Failed to read swagger document",
            ),
            SwaggerError::DocumentParse(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "document_parse_error",
                "Malformed swagger document",
            ),
            SwaggerError::StorageError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Storage error",
            ),
            SwaggerError::InvalidConfig(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid_config",
                "Invalid swagger configuration",
            ),
        };

        let mut response = (status, axum::Json(ErrorResponse { error, message })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_AUTH_CHALLENGE),
            );
        }
        response
    }
}

pub type Result<T> = std::result::Result<T, SwaggerError>;
