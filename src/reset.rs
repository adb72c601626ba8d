//! Password reset state machine.
//!
//! Per-account lifecycle: no reset pending → reset requested → back to no
//! reset pending, on success, failure or expiry. There is no persisted
//! "verified" state: verifying the code clears the pending fields and hands
//! the caller a short-lived `password_reset`-purpose token that carries the
//! verified fact statelessly.

use chrono::Duration;

use crate::auth::code;
use crate::auth::token::TokenPurpose;
use crate::db;
use crate::error::AppError;
use crate::models::Account;
use crate::models::account::normalize_email;
use crate::state::SharedState;

/// Step 1: arm a reset for the account behind `raw_email`.
///
/// Unknown emails return Ok exactly like known ones; the handler responds
/// with one fixed message either way so the endpoint cannot be used to probe
/// for accounts. For a known account the code hash and expiry are persisted
/// before the plaintext code is handed to the mailer, so a storage failure
/// surfaces without anything having been sent.
pub async fn request_reset(state: &SharedState, raw_email: &str) -> Result<(), AppError> {
    let email = normalize_email(raw_email);

    let Some(account) = db::accounts::find_by_email(&state.pool, &email).await? else {
        return Ok(());
    };

    let code = code::generate_default();
    let secret_hash = state.hasher.hash(&code);
    let expiry = state.clock.now() + Duration::minutes(state.config.reset_code_minutes);

    db::accounts::set_reset_secret(&state.pool, account.id, &secret_hash, expiry).await?;

    dispatch_code(state, account, code);
    Ok(())
}

/// Email the plaintext code on a detached task. The requester's response does
/// not wait on delivery, and a delivery failure does not roll back the stored
/// state; the code stays valid for its window regardless.
fn dispatch_code(state: &SharedState, account: Account, code: String) {
    let mailer = state.mailer.clone();
    tokio::spawn(async move {
        match mailer {
            Some(mailer) => {
                if let Err(e) = mailer
                    .send_reset_code(&account.email, &code, &account.display_name())
                    .await
                {
                    tracing::error!("Failed to send reset code to {}: {e}", account.email);
                }
            }
            None => {
                tracing::warn!("SMTP not configured. Reset code for {}: {code}", account.email);
            }
        }
    });
}

/// Step 2: check a submitted code against the stored hash.
///
/// Success clears the pending fields first (the code is single-use even
/// inside its expiry window) and returns a `password_reset`-purpose token
/// bound to the account's id and email. An expired code is also cleared on
/// detection before the error returns.
pub async fn verify_code(
    state: &SharedState,
    raw_email: &str,
    submitted_code: &str,
) -> Result<(Account, String), AppError> {
    let email = normalize_email(raw_email);

    let account = db::accounts::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("No account with that email".to_string()))?;

    let (Some(secret_hash), Some(expiry)) =
        (account.reset_secret_hash.as_deref(), account.reset_expiry)
    else {
        return Err(AppError::NoPendingReset);
    };

    if expiry < state.clock.now() {
        db::accounts::clear_reset_secret(&state.pool, account.id).await?;
        return Err(AppError::ResetCodeExpired);
    }

    if !state.hasher.verify(submitted_code, secret_hash) {
        return Err(AppError::ResetCodeMismatch);
    }

    db::accounts::clear_reset_secret(&state.pool, account.id).await?;

    let token = state
        .tokens
        .issue(
            account.id,
            TokenPurpose::PasswordReset,
            Some(account.email.clone()),
            state.clock.now(),
        )
        .map_err(AppError::Internal)?;

    Ok((account, token))
}

/// Step 3: consume a reset token and write the new password hash.
///
/// Validation order: password confirmation, token (signature, expiry and
/// purpose collapse into one error), caller-supplied identity cross-check,
/// then account lookup. The hash write and the reset-field clear are one
/// statement, so a storage failure leaves the old password valid.
pub async fn complete_reset(
    state: &SharedState,
    token: &str,
    new_password: &str,
    confirm_password: &str,
    supplied_email: Option<&str>,
) -> Result<(), AppError> {
    if new_password != confirm_password {
        return Err(AppError::PasswordMismatch);
    }

    let claims = state
        .tokens
        .validate(token, TokenPurpose::PasswordReset, state.clock.now())
        .ok_or(AppError::InvalidResetToken)?;

    if let (Some(supplied), Some(claimed)) = (supplied_email, claims.email.as_deref()) {
        if normalize_email(supplied) != claimed {
            return Err(AppError::IdentityMismatch);
        }
    }

    let account = db::accounts::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

    if !account.is_active {
        return Err(AppError::InactiveAccount);
    }

    // The email claim must still match the record it points at; a token
    // issued before an email change does not authorize the new identity.
    if let Some(claimed) = claims.email.as_deref() {
        if claimed != account.email {
            return Err(AppError::IdentityMismatch);
        }
    }

    let password_hash = state.hasher.hash(new_password);
    db::accounts::update_password(&state.pool, account.id, &password_hash).await?;

    tracing::info!("Password reset completed for account {}", account.id);
    Ok(())
}
