//! Authentication and authorization system.
//!
//! # Authentication
//!
//! Clients authenticate with email/password at `/authentication/login` (or
//! `/authentication/register` for new accounts) and receive a signed session
//! token. Later requests carry it in an `Authorization: Bearer <token>`
//! header. Tokens are self-contained: they embed the user id and an expiry,
//! so no server-side session table exists. The cost of that trade is no
//! server-initiated revocation - a compromised token stays valid until it
//! expires, or until the signing secret is rotated (which invalidates every
//! outstanding token at once).
//!
//! # Authorization
//!
//! Token verification only proves identity. Resource-level rights are checked
//! separately in the handlers: a user may delete an experience only if they
//! posted it. The two failures are distinct signals - 401 for a missing or
//! invalid token, 403 for a valid identity without rights over the resource.
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for getting the authenticated user in handlers
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: Session token creation and verification
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use intervue::api::models::users::CurrentUser;
//!
//! async fn protected_handler(current_user: CurrentUser) -> Result<String, Error> {
//!     Ok(format!("Hello, {}!", current_user.id))
//! }
//! ```

pub mod current_user;
pub mod password;
pub mod session;
