//! Domain entities - the core business objects.

mod post;
mod user;

pub use post::{Author, Comment, NewPost, Post, PostKind, Vote, VoteDirection};
pub use user::User;
