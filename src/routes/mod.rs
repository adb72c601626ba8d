pub mod auth;
pub mod password;

use axum::Router;
use axum::routing::{get, post};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/me", get(auth::me))
        // Password reset
        .route("/api/v1/password/forgot", post(password::forgot))
        .route("/api/v1/password/verify", post(password::verify))
        .route("/api/v1/password/reset", post(password::reset_password))
}
