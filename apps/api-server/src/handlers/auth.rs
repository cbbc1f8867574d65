//! Registration and login.

use actix_web::{HttpResponse, web};

use agora_core::domain::User;
use agora_core::error::DomainError;
use agora_core::ports::{AuthError, BaseRepository, PasswordService, TokenService, UserRepository};
use agora_shared::dto::{AuthResponse, CredentialsRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

/// POST /api/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<CredentialsRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let username = req.username.trim();

    if username.is_empty() {
        return Err(AppError::BadRequest("Username must not be empty".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if state.users.find_by_username(username).await?.is_some() {
        return Err(DomainError::Duplicate(format!("username {username} already exists")).into());
    }

    let password_hash = state.passwords.hash(&req.password)?;
    // The store's unique index still rejects a concurrent registration of the same name.
    let user = state
        .users
        .insert(User::new(username.to_string(), password_hash))
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(issue_token(&state, &user)?))
}

/// POST /api/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<CredentialsRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(req.username.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    Ok(HttpResponse::Ok().json(issue_token(&state, &user)?))
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;
    Ok(AuthResponse {
        token,
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}
