//! In-memory stores - used when no database is configured.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use agora_core::domain::{Post, User};
use agora_core::error::RepoError;
use agora_core::ports::{BaseRepository, PostMutation, PostRepository, UserRepository};

/// Single-node post store.
///
/// All posts sit behind one async `RwLock`. [`PostRepository::modify`] holds
/// the write lock for the whole load-apply-save cycle, so concurrent
/// mutations of the same post are serialized and none are lost.
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }

    async fn filtered<F>(&self, keep: F) -> Vec<Post>
    where
        F: Fn(&Post) -> bool,
    {
        let posts = self.posts.read().await;
        posts.iter().filter(|p| keep(p)).cloned().collect()
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn get(&self, id: &str) -> Result<Post, RepoError> {
        let posts = self.posts.read().await;
        posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.posts.read().await.clone())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Post>, RepoError> {
        Ok(self.filtered(|p| p.category == category).await)
    }

    async fn list_by_author(&self, username: &str) -> Result<Vec<Post>, RepoError> {
        Ok(self.filtered(|p| p.author.username == username).await)
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint(format!(
                "post {} already exists",
                post.id
            )));
        }
        posts.push(post.clone());
        Ok(post)
    }

    async fn replace(&self, id: &str, post: &Post) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let slot = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(())
    }

    async fn delete(&self, id: &str, requesting_user: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let pos = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;

        if posts[pos].author.id != requesting_user {
            tracing::warn!(post_id = %id, user_id = %requesting_user, "Refusing to delete post of another author");
            return Err(RepoError::Forbidden);
        }

        posts.swap_remove(pos);
        Ok(())
    }

    async fn modify(&self, id: &str, mutation: PostMutation) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let slot = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;

        // Work on a copy so a rejected mutation leaves the stored post intact.
        let mut post = slot.clone();
        mutation(&mut post)?;
        *slot = post.clone();
        Ok(post)
    }
}

/// In-memory user store keyed by id.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "username {} is taken",
                user.username
            )));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agora_core::PostService;
    use agora_core::domain::{Author, NewPost, PostKind, VoteDirection};

    use super::*;
    use crate::ids::UuidIdGenerator;

    fn service() -> (Arc<InMemoryPostRepository>, Arc<PostService>) {
        let repo = Arc::new(InMemoryPostRepository::new());
        let service = Arc::new(PostService::new(repo.clone(), Arc::new(UuidIdGenerator)));
        (repo, service)
    }

    fn author(name: &str) -> Author {
        Author {
            id: Uuid::new_v4(),
            username: name.to_string(),
        }
    }

    fn text_post(category: &str) -> NewPost {
        NewPost {
            title: "Title".to_string(),
            category: category.to_string(),
            kind: PostKind::Text,
            text: Some("body".to_string()),
            url: None,
        }
    }

    #[tokio::test]
    async fn test_listing_filters() {
        let (_, service) = service();
        let alice = author("alice");
        let bob = author("bob");
        service.create(text_post("music"), alice.clone()).await.unwrap();
        service.create(text_post("funny"), alice.clone()).await.unwrap();
        service.create(text_post("music"), bob.clone()).await.unwrap();

        assert_eq!(service.list_all().await.unwrap().len(), 3);
        assert_eq!(service.list_by_category("music").await.unwrap().len(), 2);
        assert!(service.list_by_category("Music").await.unwrap().is_empty());
        let by_bob = service.list_by_author("bob").await.unwrap();
        assert_eq!(by_bob.len(), 1);
        assert_eq!(by_bob[0].author, bob);
    }

    #[tokio::test]
    async fn test_vote_scenario_through_store() {
        let (repo, service) = service();
        let u1 = author("u1");
        let u2 = Uuid::new_v4();
        let post = service.create(text_post("news"), u1.clone()).await.unwrap();

        service.vote(&post.id, u2, VoteDirection::Up).await.unwrap();
        let post = service.vote(&post.id, u2, VoteDirection::Down).await.unwrap();
        assert_eq!((post.score, post.upvote_percentage), (0, 50));

        let post = service.unvote(&post.id, u2).await.unwrap();
        assert_eq!((post.score, post.upvote_percentage), (1, 100));
        assert_eq!(repo.get(&post.id).await.unwrap(), post);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_votes_are_not_lost() {
        let (_, service) = service();
        let post = service.create(text_post("news"), author("owner")).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..64 {
            let service = service.clone();
            let post_id = post.id.clone();
            handles.push(tokio::spawn(async move {
                let direction = if i % 4 == 0 {
                    VoteDirection::Down
                } else {
                    VoteDirection::Up
                };
                service.vote(&post_id, Uuid::new_v4(), direction).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let post = service.get(&post.id).await.unwrap();
        assert_eq!(post.votes.len(), 65);
        // 16 down, 48 up, plus the author's seed vote
        assert_eq!(post.score, 49 - 16);
        assert_eq!(post.upvote_percentage, (49 * 100 / 65) as u8);
    }

    #[tokio::test]
    async fn test_comment_ids_are_unique() {
        let (_, service) = service();
        let post = service.create(text_post("news"), author("owner")).await.unwrap();
        let writer = author("writer");

        for n in 0..20 {
            service
                .add_comment(&post.id, writer.clone(), format!("comment {n}"))
                .await
                .unwrap();
        }

        let post = service.get(&post.id).await.unwrap();
        let mut ids: Vec<_> = post.comments.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn test_rejected_mutation_keeps_stored_post() {
        let (repo, service) = service();
        let post = service.create(text_post("news"), author("owner")).await.unwrap();

        let result = repo
            .modify(
                &post.id,
                Box::new(|p: &mut Post| {
                    p.title = "changed".to_string();
                    Err(RepoError::Forbidden)
                }),
            )
            .await;

        assert!(matches!(result, Err(RepoError::Forbidden)));
        assert_eq!(repo.get(&post.id).await.unwrap().title, "Title");
    }

    #[tokio::test]
    async fn test_delete_by_non_author_is_forbidden() {
        let (_, service) = service();
        let owner = author("owner");
        let post = service.create(text_post("news"), owner.clone()).await.unwrap();

        let result = service.delete(&post.id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::Forbidden)));
        assert!(service.get(&post.id).await.is_ok());

        service.delete(&post.id, owner.id).await.unwrap();
        assert!(matches!(
            service.get(&post.id).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            service.delete(&post.id, owner.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_user_lookup_and_unique_username() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("test123456".to_string(), "hash".to_string());
        repo.insert(user.clone()).await.unwrap();

        let found = repo.find_by_username("test123456").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.find_by_id(user.id).await.unwrap().is_some());
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());

        let duplicate = User::new("test123456".to_string(), "other".to_string());
        assert!(matches!(
            repo.insert(duplicate).await,
            Err(RepoError::Constraint(_))
        ));
    }
}
