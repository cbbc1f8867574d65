//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use agora_core::domain::{Post, User};
use agora_core::error::RepoError;
use agora_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
///
/// Relies on the default [`PostRepository::modify`]: no row lock or version
/// column guards the load-replace cycle, so concurrent writers to the same
/// post race and the last replace wins.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

impl PostgresPostRepository {
    async fn find_matching(&self, condition: Condition) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .filter(condition)
            .order_by_asc(post::Column::Created)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        models.into_iter().map(Post::try_from).collect()
    }

    async fn find_model(&self, id: &str) -> Result<post::Model, RepoError> {
        PostEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn get(&self, id: &str) -> Result<Post, RepoError> {
        Post::try_from(self.find_model(id).await?)
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        self.find_matching(Condition::all()).await
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Post>, RepoError> {
        self.find_matching(Condition::all().add(post::Column::Category.eq(category)))
            .await
    }

    async fn list_by_author(&self, username: &str) -> Result<Vec<Post>, RepoError> {
        self.find_matching(Condition::all().add(post::Column::AuthorUsername.eq(username)))
            .await
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let active = post::ActiveModel::try_from(&post)?;
        active.insert(&self.db).await.map_err(map_db_err)?;

        tracing::debug!(post_id = %post.id, category = %post.category, "Post inserted");
        Ok(post)
    }

    async fn replace(&self, id: &str, post: &Post) -> Result<(), RepoError> {
        let mut active = post::ActiveModel::try_from(post)?;
        active.id = Set(id.to_owned());
        active.update(&self.db).await.map_err(map_db_err)?;

        Ok(())
    }

    async fn delete(&self, id: &str, requesting_user: Uuid) -> Result<(), RepoError> {
        let model = self.find_model(id).await?;
        if model.author_id != requesting_user {
            tracing::warn!(post_id = %id, user_id = %requesting_user, "Refusing to delete post of another author");
            return Err(RepoError::Forbidden);
        }

        let result = PostEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
