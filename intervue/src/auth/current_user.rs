//! Extractor that authenticates the caller from a bearer token.

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    errors::{Error, Result},
};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
};
use tracing::{instrument, trace};

/// Extract the bearer token from the Authorization header, if present.
/// Returns:
/// - None: No Authorization header, or not a Bearer scheme
/// - Some(token): Bearer token present (not yet verified)
fn bearer_token(parts: &Parts) -> Result<Option<&str>> {
    let auth_header = match parts.headers.get(axum::http::header::AUTHORIZATION) {
        Some(header) => header,
        None => return Ok(None),
    };

    let auth_str = auth_header.to_str().map_err(|e| Error::BadRequest {
        message: format!("Invalid authorization header: {e}"),
    })?;

    Ok(auth_str.strip_prefix("Bearer "))
}

/// The auth gate. Verifies the caller's token and resolves their identity,
/// rejecting the request before the handler runs if the token is missing,
/// malformed, expired, or signed with the wrong key. Resource-level rights
/// are not checked here; that happens against the specific record.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match bearer_token(parts)? {
            Some(token) => {
                let user_id = session::verify_session_token(token, &state.config)?;
                trace!("Authenticated user: {}", user_id);
                Ok(CurrentUser { id: user_id })
            }
            None => {
                trace!("No authentication credentials found in request");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}

/// Optional variant used by handlers whose auth requirement depends on the
/// deployment mode. Absent credentials yield `None`; credentials that are
/// present but invalid still reject the request.
impl OptionalFromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Option<Self>> {
        // Open deployments never attach an identity, even to requests that
        // carry a token
        if !state.config.auth.enabled {
            return Ok(None);
        }

        match bearer_token(parts)? {
            Some(token) => {
                let user_id = session::verify_session_token(token, &state.config)?;
                Ok(Some(CurrentUser { id: user_id }))
            }
            None => Ok(None),
        }
    }
}
