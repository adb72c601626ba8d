use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claim restricting which operation may consume a token. A login token never
/// satisfies the password-reset consumer, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Login,
    PasswordReset,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub purpose: TokenPurpose,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates signed, purpose-scoped bearer tokens. Keys and TTLs
/// are fixed at construction from process-wide config; tokens are stateless,
/// so validity is signature + expiry + purpose at check time.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    login_ttl: Duration,
    reset_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, login_ttl_minutes: i64, reset_ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            login_ttl: Duration::minutes(login_ttl_minutes),
            reset_ttl: Duration::minutes(reset_ttl_minutes),
        }
    }

    fn ttl(&self, purpose: TokenPurpose) -> Duration {
        match purpose {
            TokenPurpose::Login => self.login_ttl,
            TokenPurpose::PasswordReset => self.reset_ttl,
        }
    }

    pub fn issue(
        &self,
        subject: Uuid,
        purpose: TokenPurpose,
        email: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<String, String> {
        let claims = Claims {
            sub: subject,
            email,
            purpose,
            iat: now.timestamp(),
            exp: (now + self.ttl(purpose)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| format!("JWT encode failed: {e}"))
    }

    /// Returns the claims only when signature, expiry and purpose all check
    /// out. All failure modes collapse into `None` so callers cannot tell
    /// which check failed.
    pub fn validate(
        &self,
        token: &str,
        expected: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Option<Claims> {
        // Expiry is checked against the injected clock below, not by the
        // library against wall-clock time.
        let mut validation = Validation::default();
        validation.validate_exp = false;

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .ok()?
            .claims;

        if claims.exp <= now.timestamp() {
            return None;
        }
        if claims.purpose != expected {
            return None;
        }
        Some(claims)
    }
}
