use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;

/// Generic repository trait for entities addressed by a primary key.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their (unique) username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// In-place change applied to a loaded post before it is written back.
///
/// Returning an error aborts the write.
pub type PostMutation = Box<dyn FnOnce(&mut Post) -> Result<(), RepoError> + Send>;

/// Post store. Every operation loads or saves the whole post document.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Load a post, or `RepoError::NotFound`.
    async fn get(&self, id: &str) -> Result<Post, RepoError>;

    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts whose category equals `category` exactly.
    async fn list_by_category(&self, category: &str) -> Result<Vec<Post>, RepoError>;

    /// Posts whose author snapshot carries `username` exactly.
    async fn list_by_author(&self, username: &str) -> Result<Vec<Post>, RepoError>;

    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Overwrite the stored document for `id` with `post`.
    async fn replace(&self, id: &str, post: &Post) -> Result<(), RepoError>;

    /// Remove a post. Only its author may do so (`RepoError::Forbidden` otherwise).
    async fn delete(&self, id: &str, requesting_user: Uuid) -> Result<(), RepoError>;

    /// Load `id`, apply `mutation` and write the result back.
    ///
    /// The default is a plain `get` followed by `replace` with no version
    /// check: two concurrent calls on the same post race and the last
    /// `replace` wins. Stores that can serialize the cycle should override it.
    async fn modify(&self, id: &str, mutation: PostMutation) -> Result<Post, RepoError> {
        let mut post = self.get(id).await?;
        mutation(&mut post)?;
        self.replace(id, &post).await?;
        Ok(post)
    }
}
