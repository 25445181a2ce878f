//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Database request/response structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Repository Pattern
//!
//! The [`handlers`] module provides a repository per table. Repositories
//! encapsulate all database access for a specific entity type and surface
//! constraint violations as typed [`errors::DbError`] values, so uniqueness
//! is enforced where it must be - at the store - rather than by
//! check-then-insert in application code.
//!
//! ## Example Usage
//!
//! ```ignore
//! use intervue::db::handlers::Users;
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut users_repo = Users::new(&mut conn);
//!
//!     if let Some(user) = users_repo.get_user_by_email("user@example.com").await? {
//!         println!("Found user: {}", user.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/`
//! directory. The [`crate::migrator`] function provides access to the migrator:
//!
//! ```ignore
//! intervue::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
