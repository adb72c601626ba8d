use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::code::CODE_LEN;
use crate::error::AppError;
use crate::reset;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
    /// Optional cross-check against the token's email claim.
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct VerifyCodeResponse {
    pub message: String,
    pub reset_token: String,
    pub account_id: Uuid,
}

/// Step 1 of the reset flow. The response body is the same fixed message
/// whether or not the email maps to an account.
pub async fn forgot(
    State(state): State<SharedState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    reset::request_reset(&state, &req.email).await?;

    Ok(Json(MessageResponse {
        message: "If that email is registered, a reset code has been sent.".to_string(),
    }))
}

/// Step 2: exchange the emailed code for a reset token.
pub async fn verify(
    State(state): State<SharedState>,
    Json(req): Json<VerifyCodeRequest>,
) -> Result<Json<VerifyCodeResponse>, AppError> {
    if req.code.len() != CODE_LEN || !req.code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::BadRequest(
            "Reset code must be 6 digits".to_string(),
        ));
    }

    let (account, token) = reset::verify_code(&state, &req.email, &req.code).await?;

    Ok(Json(VerifyCodeResponse {
        message: "Reset code verified".to_string(),
        reset_token: token,
        account_id: account.id,
    }))
}

/// Step 3: consume the reset token and set the new password.
pub async fn reset_password(
    State(state): State<SharedState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.new_password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    reset::complete_reset(
        &state,
        &req.token,
        &req.new_password,
        &req.confirm_password,
        req.email.as_deref(),
    )
    .await?;

    Ok(Json(MessageResponse {
        message: "Password reset successful. You can now log in with your new password."
            .to_string(),
    }))
}
