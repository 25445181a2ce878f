use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    api::models::auth::{AuthResponse, LoginRequest, RegisterRequest},
    auth::{
        password::{self, Argon2Params},
        session,
    },
    db::{errors::DbError, handlers::Users, models::users::UserCreateDBRequest},
    errors::Error,
};

fn duplicate_email_error() -> Error {
    Error::BadRequest {
        message: "An account with this email address already exists".to_string(),
    }
}

fn invalid_credentials_error() -> Error {
    Error::BadRequest {
        message: "Invalid email or password".to_string(),
    }
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/authentication/register",
    request_body = RegisterRequest,
    tag = "authentication",
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid input or email already registered"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Json(request): Json<RegisterRequest>) -> Result<(StatusCode, Json<AuthResponse>), Error> {
    // Check if authentication is enabled
    if !state.config.auth.enabled {
        return Err(Error::BadRequest {
            message: "Authentication is disabled".to_string(),
        });
    }

    // Check if registration is allowed
    if !state.config.auth.allow_registration {
        return Err(Error::BadRequest {
            message: "User registration is disabled".to_string(),
        });
    }

    // Presence checks
    if request.name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Name cannot be empty".to_string(),
        });
    }
    if request.email.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Email cannot be empty".to_string(),
        });
    }

    // Validate password length
    let password_config = &state.config.auth.password;
    if request.password.len() < password_config.min_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at least {} characters", password_config.min_length),
        });
    }
    if request.password.len() > password_config.max_length {
        return Err(Error::BadRequest {
            message: format!("Password must be no more than {} characters", password_config.max_length),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    // Friendly early rejection; the unique constraint below is what actually
    // guarantees atomicity under concurrent registration
    if user_repo.get_user_by_email(&request.email).await?.is_some() {
        return Err(duplicate_email_error());
    }

    // Hash the password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let params = Argon2Params::from(password_config);
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string_with_params(&password, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let create_request = UserCreateDBRequest {
        name: request.name,
        email: request.email,
        password_hash,
    };

    let created_user = user_repo.create(&create_request).await.map_err(|e| match e {
        // A concurrent registration won the race between the existence check
        // and the insert
        DbError::UniqueViolation { .. } => duplicate_email_error(),
        other => Error::Database(other),
    })?;

    // Create session token
    let token = session::create_session_token(created_user.id, &state.config)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: created_user.into(),
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/authentication/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<AuthResponse>, Error> {
    // Check if authentication is enabled
    if !state.config.auth.enabled {
        return Err(Error::BadRequest {
            message: "Authentication is disabled".to_string(),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    // Find user by email; the same message covers an unknown email and a
    // wrong password so responses don't enumerate accounts
    let user = user_repo
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(invalid_credentials_error)?;

    // Verify password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(invalid_credentials_error());
    }

    // Create session token
    let token = session::create_session_token(user.id, &state.config)?;

    Ok(Json(AuthResponse { token, user: user.into() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, create_test_config};
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_success(pool: PgPool) {
        let server = create_test_app(pool, create_test_config());

        let response = server
            .post("/authentication/register")
            .json(&json!({
                "name": "Test User",
                "email": "test@example.com",
                "password": "password123",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);

        let body: AuthResponse = response.json();
        assert!(!body.token.is_empty());
        assert_eq!(body.user.name, "Test User");
        assert_eq!(body.user.email, "test@example.com");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_duplicate_email(pool: PgPool) {
        let server = create_test_app(pool, create_test_config());

        let request = json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "password123",
        });

        let response = server.post("/authentication/register").json(&request).await;
        response.assert_status(axum::http::StatusCode::CREATED);

        // Same email again, different name
        let response = server
            .post("/authentication/register")
            .json(&json!({
                "name": "Impostor",
                "email": "alice@example.com",
                "password": "different-pass",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "An account with this email address already exists");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_password_too_short(pool: PgPool) {
        let server = create_test_app(pool, create_test_config());

        let response = server
            .post("/authentication/register")
            .json(&json!({
                "name": "Test User",
                "email": "short@example.com",
                "password": "short",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_empty_name(pool: PgPool) {
        let server = create_test_app(pool, create_test_config());

        let response = server
            .post("/authentication/register")
            .json(&json!({
                "name": "  ",
                "email": "blank@example.com",
                "password": "password123",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_register_disabled(pool: PgPool) {
        let mut config = create_test_config();
        config.auth.allow_registration = false;
        let server = create_test_app(pool, config);

        let response = server
            .post("/authentication/register")
            .json(&json!({
                "name": "Test User",
                "email": "test@example.com",
                "password": "password123",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_success(pool: PgPool) {
        let server = create_test_app(pool, create_test_config());

        server
            .post("/authentication/register")
            .json(&json!({
                "name": "Login User",
                "email": "login@example.com",
                "password": "password123",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = server
            .post("/authentication/login")
            .json(&json!({
                "email": "login@example.com",
                "password": "password123",
            }))
            .await;

        response.assert_status_ok();
        let body: AuthResponse = response.json();
        assert!(!body.token.is_empty());
        assert_eq!(body.user.email, "login@example.com");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_wrong_password(pool: PgPool) {
        let server = create_test_app(pool, create_test_config());

        server
            .post("/authentication/register")
            .json(&json!({
                "name": "Login User",
                "email": "login@example.com",
                "password": "password123",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = server
            .post("/authentication/login")
            .json(&json!({
                "email": "login@example.com",
                "password": "wrong-password",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Invalid email or password");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_login_unknown_email_same_message(pool: PgPool) {
        let server = create_test_app(pool, create_test_config());

        let response = server
            .post("/authentication/login")
            .json(&json!({
                "email": "nobody@example.com",
                "password": "password123",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Invalid email or password");
    }
}
