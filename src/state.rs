use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::password::CredentialHasher;
use crate::auth::token::TokenIssuer;
use crate::clock::Clock;
use crate::config::Config;
use crate::email::SystemMailer;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub hasher: CredentialHasher,
    pub tokens: TokenIssuer,
    pub clock: Clock,
    pub mailer: Option<Arc<SystemMailer>>,
}
