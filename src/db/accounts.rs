use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Account;

pub async fn create(
    pool: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    username: &str,
    password_hash: &str,
) -> Result<Account, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "INSERT INTO accounts (first_name, last_name, email, username, password_hash)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Arm a pending reset: both fields written in one statement so the
/// both-or-neither invariant holds per record. Overwrites any prior pending
/// reset (last writer wins).
pub async fn set_reset_secret(
    pool: &PgPool,
    id: Uuid,
    secret_hash: &str,
    expiry: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE accounts SET reset_secret_hash = $2, reset_expiry = $3 WHERE id = $1")
        .bind(id)
        .bind(secret_hash)
        .bind(expiry)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn clear_reset_secret(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE accounts SET reset_secret_hash = NULL, reset_expiry = NULL WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Write the new password hash and clear any residual reset state in the
/// same statement, so a retry never sees a half-applied record.
pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE accounts SET password_hash = $2, reset_secret_hash = NULL, reset_expiry = NULL
         WHERE id = $1",
    )
    .bind(id)
    .bind(password_hash)
    .execute(pool)
    .await?;
    Ok(())
}
