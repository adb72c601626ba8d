use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    BadRequest(String),
    Conflict(String),
    NoPendingReset,
    ResetCodeExpired,
    ResetCodeMismatch,
    PasswordMismatch,
    InvalidResetToken,
    IdentityMismatch,
    InactiveAccount,
    Internal(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::NoPendingReset => write!(f, "No pending password reset"),
            AppError::ResetCodeExpired => write!(f, "Reset code expired"),
            AppError::ResetCodeMismatch => write!(f, "Reset code mismatch"),
            AppError::PasswordMismatch => write!(f, "Password mismatch"),
            AppError::InvalidResetToken => write!(f, "Invalid reset token"),
            AppError::IdentityMismatch => write!(f, "Identity mismatch"),
            AppError::InactiveAccount => write!(f, "Inactive account"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::NoPendingReset => (
                StatusCode::BAD_REQUEST,
                "No password reset is pending for this account".to_string(),
            ),
            AppError::ResetCodeExpired => (
                StatusCode::BAD_REQUEST,
                "Reset code has expired".to_string(),
            ),
            AppError::ResetCodeMismatch => {
                (StatusCode::BAD_REQUEST, "Invalid reset code".to_string())
            }
            AppError::PasswordMismatch => {
                (StatusCode::BAD_REQUEST, "Passwords do not match".to_string())
            }
            // Signature failure, expiry, malformed structure and purpose
            // mismatch all collapse into this one message.
            AppError::InvalidResetToken => (
                StatusCode::BAD_REQUEST,
                "Invalid or expired reset token".to_string(),
            ),
            AppError::IdentityMismatch => (
                StatusCode::BAD_REQUEST,
                "Token does not match the supplied identity".to_string(),
            ),
            AppError::InactiveAccount => {
                (StatusCode::FORBIDDEN, "Account is inactive".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Temporary storage error, please retry".to_string(),
                )
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}
