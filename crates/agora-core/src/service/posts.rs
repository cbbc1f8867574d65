//! Post service - every post mutation is load, apply, replace.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Author, Comment, NewPost, Post, VoteDirection};
use crate::error::RepoError;
use crate::ports::{IdGenerator, PostRepository};

/// Drives the vote/comment engine on [`Post`] through a [`PostRepository`].
///
/// Store errors are returned exactly as the repository produced them.
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repo, ids }
    }

    pub async fn get(&self, id: &str) -> Result<Post, RepoError> {
        self.repo.get(id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        self.repo.list_all().await
    }

    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Post>, RepoError> {
        self.repo.list_by_category(category).await
    }

    pub async fn list_by_author(&self, username: &str) -> Result<Vec<Post>, RepoError> {
        self.repo.list_by_author(username).await
    }

    /// Create a post for `author`, seeded with the author's upvote.
    pub async fn create(&self, new_post: NewPost, author: Author) -> Result<Post, RepoError> {
        let post = Post::new(self.ids.new_id(), new_post, author);
        self.repo.insert(post).await
    }

    pub async fn delete(&self, id: &str, requesting_user: Uuid) -> Result<(), RepoError> {
        self.repo.delete(id, requesting_user).await
    }

    pub async fn vote(
        &self,
        post_id: &str,
        voter: Uuid,
        direction: VoteDirection,
    ) -> Result<Post, RepoError> {
        self.repo
            .modify(
                post_id,
                Box::new(move |post: &mut Post| {
                    post.apply_vote(voter, direction);
                    Ok(())
                }),
            )
            .await
    }

    pub async fn unvote(&self, post_id: &str, voter: Uuid) -> Result<Post, RepoError> {
        self.repo
            .modify(
                post_id,
                Box::new(move |post: &mut Post| {
                    post.apply_unvote(voter);
                    Ok(())
                }),
            )
            .await
    }

    /// Attach a new comment with a freshly generated id.
    pub async fn add_comment(
        &self,
        post_id: &str,
        author: Author,
        body: String,
    ) -> Result<Post, RepoError> {
        let comment = Comment::new(self.ids.new_id(), author, body);
        self.repo
            .modify(
                post_id,
                Box::new(move |post: &mut Post| {
                    post.add_comment(comment);
                    Ok(())
                }),
            )
            .await
    }

    /// Remove a comment. Allowed for the comment's author and the post's author.
    ///
    /// An unknown comment id leaves the post as it was.
    pub async fn delete_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        requesting_user: Uuid,
    ) -> Result<Post, RepoError> {
        let comment_id = comment_id.to_owned();
        self.repo
            .modify(
                post_id,
                Box::new(move |post: &mut Post| {
                    let Some(comment) = post.comment(&comment_id) else {
                        return Ok(());
                    };
                    if comment.author.id != requesting_user && post.author.id != requesting_user {
                        return Err(RepoError::Forbidden);
                    }
                    post.delete_comment(&comment_id);
                    Ok(())
                }),
            )
            .await
    }
}
