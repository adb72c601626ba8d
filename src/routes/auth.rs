use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::token::TokenPurpose;
use crate::db;
use crate::error::AppError;
use crate::models::Account;
use crate::models::account::normalize_email;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub account_id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub account_id: Uuid,
}

pub async fn signup(
    State(state): State<SharedState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
        return Err(AppError::BadRequest("Name fields are required".to_string()));
    }

    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if req.password != req.confirm_password {
        return Err(AppError::PasswordMismatch);
    }

    let email = normalize_email(&req.email);
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }

    let first_name = req.first_name.trim();
    let last_name = req.last_name.trim();
    let username = format!("{first_name}{last_name}").to_lowercase();

    let password_hash = state.hasher.hash(&req.password);

    let account = db::accounts::create(
        &state.pool,
        first_name,
        last_name,
        &email,
        &username,
        &password_hash,
    )
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Email or username already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(Json(SignupResponse {
        message: "Signup successful".to_string(),
        account_id: account.id,
        username: account.username,
        email: account.email,
    }))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let account = db::accounts::find_by_username(&state.pool, &req.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !state.hasher.verify(&req.password, &account.password_hash) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state
        .tokens
        .issue(account.id, TokenPurpose::Login, None, state.clock.now())
        .map_err(AppError::Internal)?;

    Ok(Json(LoginResponse {
        token,
        account_id: account.id,
    }))
}

pub async fn me(
    State(state): State<SharedState>,
    user: AuthUser,
) -> Result<Json<Account>, AppError> {
    let account = db::accounts::find_by_id(&state.pool, user.account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

    Ok(Json(account))
}
