//! Post, vote and comment handlers.

use actix_web::{HttpResponse, web};

use agora_core::domain::{NewPost, PostKind, VoteDirection};
use agora_shared::MessageResponse;
use agora_shared::dto::{CreatePostRequest, NewCommentRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts/
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.posts.list_all().await?))
}

/// GET /api/posts/{category}
pub async fn list_by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_by_category(&path).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/user/{username}
pub async fn list_by_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_by_author(&path).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/post/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.posts.get(&path).await?))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let new_post = NewPost {
        title: req.title,
        category: req.category,
        kind: req.kind.parse::<PostKind>()?,
        text: req.text,
        url: req.url,
    };
    new_post.validate()?;

    let post = state.posts.create(new_post, identity.author()).await?;
    tracing::info!(post_id = %post.id, author = %identity.username, "Post created");

    Ok(HttpResponse::Created().json(post))
}

/// DELETE /api/post/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.delete(&path, identity.user_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("success")))
}

/// GET /api/post/{id}/upvote
pub async fn upvote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    vote(state, identity, &path, VoteDirection::Up).await
}

/// GET /api/post/{id}/downvote
pub async fn downvote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    vote(state, identity, &path, VoteDirection::Down).await
}

async fn vote(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: &str,
    direction: VoteDirection,
) -> AppResult<HttpResponse> {
    let post = state.posts.vote(post_id, identity.user_id, direction).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// GET /api/post/{id}/unvote
pub async fn unvote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.unvote(&path, identity.user_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/post/{id}
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<NewCommentRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner().comment;
    if body.trim().is_empty() {
        return Err(AppError::BadRequest("Comment must not be empty".to_string()));
    }

    let post = state
        .posts
        .add_comment(&path, identity.author(), body)
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// DELETE /api/post/{id}/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let post = state
        .posts
        .delete_comment(&post_id, &comment_id, identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}
