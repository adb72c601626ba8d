use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use passgate::auth::password::CredentialHasher;
use passgate::clock::Clock;
use passgate::config::Config;

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn post_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Create an account, return body + status.
    pub async fn signup(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> (Value, StatusCode) {
        self.post_json(
            "/api/v1/auth/signup",
            &json!({
                "first_name": first_name,
                "last_name": last_name,
                "email": email,
                "password": password,
                "confirm_password": password,
            }),
        )
        .await
    }

    /// Login by username, return body + status.
    pub async fn login(&self, username: &str, password: &str) -> (Value, StatusCode) {
        self.post_json(
            "/api/v1/auth/login",
            &json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn forgot(&self, email: &str) -> (Value, StatusCode) {
        self.post_json("/api/v1/password/forgot", &json!({ "email": email }))
            .await
    }

    pub async fn verify_code(&self, email: &str, code: &str) -> (Value, StatusCode) {
        self.post_json(
            "/api/v1/password/verify",
            &json!({ "email": email, "code": code }),
        )
        .await
    }

    pub async fn reset_password(&self, body: &Value) -> (Value, StatusCode) {
        self.post_json("/api/v1/password/reset", body).await
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Read the reset sub-state straight from the row.
    pub async fn reset_state(&self, email: &str) -> (Option<String>, Option<DateTime<Utc>>) {
        sqlx::query_as("SELECT reset_secret_hash, reset_expiry FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .expect("account row missing")
    }

    /// Arm a known reset code for an account, as a prior forgot call would
    /// have, so tests can drive the verify step with a code they know.
    pub async fn arm_reset_code(&self, email: &str, code: &str, expiry: DateTime<Utc>) {
        let hash = CredentialHasher::new().hash(code);
        sqlx::query(
            "UPDATE accounts SET reset_secret_hash = $2, reset_expiry = $3 WHERE email = $1",
        )
        .bind(email)
        .bind(hash)
        .bind(expiry)
        .execute(&self.pool)
        .await
        .expect("failed to arm reset code");
    }
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    // Create a unique test database
    let db_name = format!(
        "passgate_test_{}",
        Uuid::now_v7().to_string().replace('-', "")
    );

    // Connect to default postgres DB to create test DB
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    // Connect to test DB and run migrations
    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        login_token_minutes: 60,
        reset_token_minutes: 15,
        reset_code_minutes: 15,
        log_level: "warn".to_string(),
        smtp: None,
    };

    let (app, _state) = passgate::build_app(pool.clone(), config, Clock::system());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        db_name,
    }
}

/// Drop the per-test database.
pub async fn cleanup(app: TestApp) {
    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    app.pool.close().await;

    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    if let Ok(admin_pool) = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
    {
        let _ = sqlx::query(&format!(
            "DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)",
            app.db_name
        ))
        .execute(&admin_pool)
        .await;
        admin_pool.close().await;
    }
}
