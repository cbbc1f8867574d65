//! # Agora Infrastructure
//!
//! Concrete implementations of the ports defined in `agora-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL stores via SeaORM
//! - `minimal` - In-memory stores only

pub mod auth;
pub mod database;
pub mod ids;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{InMemoryPostRepository, InMemoryUserRepository};
pub use ids::UuidIdGenerator;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, DatabaseConnections};
