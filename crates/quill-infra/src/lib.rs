//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! SeaORM repositories over PostgreSQL or SQLite, JWT tokens and Argon2
//! password hashing.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `database` - SeaORM repositories and connection setup
//! - `auth` - JWT + Argon2 authentication

#[cfg(feature = "database")]
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "database")]
pub use database::{
    DatabaseConfig, DatabaseConnection, SqlCategoryRepository, SqlCommentRepository,
    SqlPostRepository, SqlTagRepository, SqlUserRepository,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
