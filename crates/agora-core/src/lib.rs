//! # Agora Core
//!
//! The domain layer of the Agora discussion board.
//! Posts, votes and comments, the ports infrastructure must implement, and the
//! service that drives every post mutation through a store. No I/O lives here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
pub use service::PostService;
