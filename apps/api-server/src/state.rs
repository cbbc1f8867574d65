//! Application state - shared across all handlers.

use std::sync::Arc;

use agora_core::PostService;
use agora_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use agora_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService, UuidIdGenerator,
};

#[cfg(feature = "postgres")]
use agora_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use agora_infra::database::{PostgresPostRepository, PostgresUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

type Stores = (Arc<dyn PostRepository>, Arc<dyn UserRepository>);

impl AppState {
    /// Build the application state, falling back to in-memory stores when
    /// no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let stores = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let post_repo: Arc<dyn PostRepository> =
                        Arc::new(PostgresPostRepository::new(connections.main.clone()));
                    let user_repo: Arc<dyn UserRepository> =
                        Arc::new(PostgresUserRepository::new(connections.main));
                    (post_repo, user_repo)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    in_memory_stores()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory_stores()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let stores = {
            tracing::info!("Running without postgres feature - using in-memory stores");
            in_memory_stores()
        };

        let state = Self::assemble(stores, config.jwt.clone());
        tracing::info!("Application state initialized");
        state
    }

    /// State backed entirely by in-memory stores.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        Self::assemble(in_memory_stores(), jwt)
    }

    fn assemble((post_repo, users): Stores, jwt: JwtConfig) -> Self {
        Self {
            posts: Arc::new(PostService::new(post_repo, Arc::new(UuidIdGenerator))),
            users,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }
}

fn in_memory_stores() -> Stores {
    (
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
    )
}
