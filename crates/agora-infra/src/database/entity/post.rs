//! Post entity for SeaORM.
//!
//! A post is stored as one row; its votes and comments live in JSONB
//! columns so the whole aggregate is read and replaced together.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use agora_core::domain::{Author, Post};
use agora_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub text: Option<String>,
    pub kind: String,
    pub category: String,
    pub author_id: Uuid,
    pub author_username: String,
    pub score: i32,
    pub upvote_percentage: i16,
    #[sea_orm(column_type = "JsonBinary")]
    pub votes: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: Json,
    pub views: i32,
    pub created: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn corrupt(field: &str, err: impl std::fmt::Display) -> RepoError {
    RepoError::Serialization(format!("posts.{field}: {err}"))
}

impl TryFrom<Model> for Post {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: model.kind.parse().map_err(|e| corrupt("kind", e))?,
            upvote_percentage: u8::try_from(model.upvote_percentage)
                .map_err(|e| corrupt("upvote_percentage", e))?,
            views: u32::try_from(model.views).map_err(|e| corrupt("views", e))?,
            votes: serde_json::from_value(model.votes).map_err(|e| corrupt("votes", e))?,
            comments: serde_json::from_value(model.comments)
                .map_err(|e| corrupt("comments", e))?,
            id: model.id,
            title: model.title,
            url: model.url,
            text: model.text,
            category: model.category,
            author: Author {
                id: model.author_id,
                username: model.author_username,
            },
            score: model.score,
            created: model.created.into(),
        })
    }
}

impl TryFrom<&Post> for ActiveModel {
    type Error = RepoError;

    fn try_from(post: &Post) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Set(post.id.clone()),
            title: Set(post.title.clone()),
            url: Set(post.url.clone()),
            text: Set(post.text.clone()),
            kind: Set(post.kind.as_str().to_string()),
            category: Set(post.category.clone()),
            author_id: Set(post.author.id),
            author_username: Set(post.author.username.clone()),
            score: Set(post.score),
            upvote_percentage: Set(i16::from(post.upvote_percentage)),
            votes: Set(serde_json::to_value(&post.votes).map_err(|e| corrupt("votes", e))?),
            comments: Set(
                serde_json::to_value(&post.comments).map_err(|e| corrupt("comments", e))?
            ),
            views: Set(i32::try_from(post.views).map_err(|e| corrupt("views", e))?),
            created: Set(post.created.into()),
        })
    }
}
