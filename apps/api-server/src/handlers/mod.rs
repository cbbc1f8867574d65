//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/posts/", web::get().to(posts::list))
            .route("/posts/{category}", web::get().to(posts::list_by_category))
            .route("/user/{username}", web::get().to(posts::list_by_author))
            .route("/post/{id}", web::get().to(posts::get))
            // Authenticated routes
            .route("/posts", web::post().to(posts::create))
            .route("/post/{id}", web::post().to(posts::add_comment))
            .route("/post/{id}", web::delete().to(posts::delete))
            .route("/post/{id}/upvote", web::get().to(posts::upvote))
            .route("/post/{id}/downvote", web::get().to(posts::downvote))
            .route("/post/{id}/unvote", web::get().to(posts::unvote))
            .route(
                "/post/{id}/{comment_id}",
                web::delete().to(posts::delete_comment),
            ),
    );
}
