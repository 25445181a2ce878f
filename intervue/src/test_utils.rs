//! Shared helpers for tests.

use crate::{AppState, build_router, config::Config};
use axum_test::TestServer;
use sqlx::PgPool;

/// A config suitable for tests: auth enabled, a fixed signing secret, and
/// cheap hashing parameters so the suite stays fast.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.secret_key = Some("test-secret-key-for-testing-only".to_string());
    config.auth.password.argon2_memory_kib = 1024;
    config.auth.password.argon2_iterations = 1;
    config
}

/// State backed by a lazily-connecting pool, for tests that never touch the
/// database (extractor and router construction tests).
pub fn create_test_state() -> AppState {
    let db = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgresql://localhost/intervue_test")
        .expect("lazy pool");
    AppState::builder().db(db).config(create_test_config()).build()
}

/// Build a test server over the full router with the given pool and config.
pub fn create_test_app(pool: PgPool, config: Config) -> TestServer {
    let state = AppState::builder().db(pool).config(config).build();
    let router = build_router(&state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}
