//! Repository implementations for database access.
//!
//! Each repository:
//! - Wraps a SQLx connection
//! - Provides strongly-typed CRUD operations
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Users`]: User account storage and login lookups
//! - [`Experiences`]: Interview experience records

pub mod experiences;
pub mod repository;
pub mod users;

pub use experiences::{ExperienceFilter, Experiences};
pub use repository::Repository;
pub use users::Users;
