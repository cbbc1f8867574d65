//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod ids;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use ids::IdGenerator;
pub use repository::{BaseRepository, PostMutation, PostRepository, UserRepository};
