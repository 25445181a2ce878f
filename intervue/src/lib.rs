//! # intervue: a backend for sharing interview experiences
//!
//! `intervue` is a small REST service where users sign up, log in, and post,
//! read, or delete records describing a company's interview process. It is
//! built around a deliberately thin authentication and authorization core:
//! credential storage with salted adaptive password hashing, stateless signed
//! session tokens, a bearer-token auth gate, and ownership-checked deletion.
//!
//! ## Overview
//!
//! Accounts are created at `/authentication/register` and exchanged for a
//! session token there or at `/authentication/login`. The token is a signed,
//! self-contained claim carrying the account id and an expiry (7 days by
//! default); no session state is kept server-side, so there is no revocation
//! short of rotating the signing secret. Experience records are public to
//! read; posting and deleting require a token, and a record can only be
//! deleted by the user who posted it.
//!
//! The service also supports an open deployment mode (`auth.enabled = false`)
//! in which records carry no owner and anyone may post or delete. The mode is
//! a per-deployment configuration axis, not a per-request choice.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL for all persistence.
//!
//! Request flow for a protected mutation: the auth gate
//! ([`auth::current_user`]) verifies the bearer token and attaches the
//! caller's identity; the handler then looks up the target record (404 if
//! absent), compares its owner with the caller (403 on mismatch), and only
//! then mutates. Each failure is a distinct terminal status; nothing is
//! retried.
//!
//! The **API layer** ([`api`]) exposes authentication routes at
//! `/authentication/*` and record routes at `/api/v1/experiences`. The
//! **database layer** ([`db`]) uses the repository pattern; constraint
//! enforcement (email uniqueness, owner references) lives in PostgreSQL, and
//! repositories surface violations as typed errors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use intervue::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Parse CLI arguments and load configuration
//!     let args = intervue::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     // Initialize structured logging
//!     intervue::telemetry::init_telemetry()?;
//!
//!     // Create and start the application
//!     let app = Application::new(config).await?;
//!
//!     // Run with graceful shutdown on Ctrl+C
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;

#[cfg(test)]
pub mod test_utils;

use crate::openapi::ApiDoc;
use axum::{
    Router, http,
    http::HeaderValue,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use config::CorsOrigin;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{ExperienceId, Operation, UserId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the intervue database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.security.cors;

    let has_wildcard = cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard));
    let mut cors = if has_wildcard {
        // Config validation rejects wildcard + credentials, so Any is safe here
        CorsLayer::new().allow_origin(tower_http::cors::Any)
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Url serializes with a trailing slash; Origin headers carry none
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(cors_config.allow_credentials)
    };

    cors = cors
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::DELETE])
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE]);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// This function constructs the complete Axum router with:
/// - Authentication routes (registration, login)
/// - Experience record routes (create/list/get/delete)
/// - API documentation at `/docs`
/// - CORS configuration
/// - Tracing middleware
///
/// # Errors
///
/// Returns an error if the CORS configuration is invalid.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    // Authentication routes (at root level)
    let auth_routes = Router::new()
        .route("/authentication/register", post(api::handlers::auth::register))
        .route("/authentication/login", post(api::handlers::auth::login))
        .with_state(state.clone());

    // API routes
    let api_routes = Router::new()
        .route(
            "/experiences",
            get(api::handlers::experiences::list_experiences).post(api::handlers::experiences::create_experience),
        )
        .route(
            "/experiences/{id}",
            get(api::handlers::experiences::get_experience).delete(api::handlers::experiences::delete_experience),
        )
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(auth_routes)
        .nest("/api/v1", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Create CORS layer from config
    let cors_layer = create_cors_layer(&state.config)?;

    // Apply CORS and tracing
    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The application: a configured router plus the resources it owns.
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting intervue with configuration: {:#?}", config);

        let pool = PgPoolOptions::new()
            .max_connections(config.database.pool.max_connections)
            .min_connections(config.database.pool.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.database.pool.acquire_timeout_secs))
            .connect(&config.database.url)
            .await?;

        // Run migrations
        migrator().run(&pool).await?;

        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "intervue listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        // Close database connections
        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
